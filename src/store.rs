use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{Error, IoResultExt, Result};
use crate::fs::{hash_file, write_atomic};
use crate::hash::{compute_hash, Hash};
use crate::repo::Repo;

/// content-addressed, append-only object store
///
/// objects are raw bytes stored at `.vcs/objects/<hex digest>`. the store does
/// not know whether an object is file content or a serialized commit.
pub struct ObjectStore<'a> {
    repo: &'a Repo,
}

impl<'a> ObjectStore<'a> {
    pub fn new(repo: &'a Repo) -> Self {
        Self { repo }
    }

    /// store `content` and return its hash
    ///
    /// writing content that is already present is a successful no-op. an
    /// existing object whose bytes no longer match its name is rewritten.
    pub fn put(&self, content: &[u8]) -> Result<Hash> {
        let hash = compute_hash(content);
        let path = self.object_path(&hash);

        if path.is_file() {
            if hash_file(&path)? == hash {
                debug!(%hash, "object already present");
                return Ok(hash);
            }
            warn!(%hash, "replacing corrupt object");
        }

        write_atomic(
            &self.repo.tmp_path(),
            &path,
            content,
            self.repo.config().fsync,
        )?;
        debug!(%hash, size = content.len(), "wrote object");

        Ok(hash)
    }

    /// read the exact bytes stored under `hash`
    pub fn get(&self, hash: &Hash) -> Result<Vec<u8>> {
        let path = self.object_path(hash);

        let content = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ObjectNotFound(*hash)
            } else {
                Error::Io {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;

        // verify hash
        if compute_hash(&content) != *hash {
            return Err(Error::CorruptObject(*hash));
        }

        Ok(content)
    }

    /// check if an object exists
    pub fn exists(&self, hash: &Hash) -> bool {
        self.object_path(hash).is_file()
    }

    /// get the filesystem path to an object
    pub fn object_path(&self, hash: &Hash) -> PathBuf {
        self.repo.objects_path().join(hash.to_hex())
    }

    /// list every stored object, sorted by hash
    pub fn list(&self) -> Result<Vec<Hash>> {
        let dir = self.repo.objects_path();
        let mut hashes = Vec::new();

        for entry in fs::read_dir(&dir).with_path(&dir)? {
            let entry = entry.with_path(&dir)?;
            let name = entry.file_name();
            match Hash::from_hex(&name.to_string_lossy()) {
                Ok(hash) => hashes.push(hash),
                Err(_) => warn!(name = %name.to_string_lossy(), "ignoring stray file in object store"),
            }
        }

        hashes.sort();
        Ok(hashes)
    }
}
