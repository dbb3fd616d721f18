//! the staging index: repository-relative path -> most recently staged hash
//!
//! persisted as TOML at `.vcs/index` and rewritten wholesale on every change.
//! content is always written to the object store before the index refers to
//! it, so a crash can orphan an object but never leave a dangling entry.

use std::collections::BTreeMap;
use std::fs;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fs::write_atomic;
use crate::hash::Hash;
use crate::repo::Repo;
use crate::store::ObjectStore;

const INDEX_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, Hash>,
}

impl Default for Index {
    fn default() -> Self {
        Self {
            version: INDEX_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

impl Index {
    /// load the index from disk
    pub fn load(repo: &Repo) -> Result<Self> {
        let path = repo.index_path();

        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::IndexUnavailable(path.clone())
            } else {
                Error::Io {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;

        let index: Index = toml::from_str(&content).map_err(|e| Error::IndexCorrupt {
            path: path.clone(),
            message: e.to_string(),
        })?;

        if index.version != INDEX_VERSION {
            return Err(Error::IndexCorrupt {
                path,
                message: format!("unsupported index version {}", index.version),
            });
        }

        Ok(index)
    }

    /// write the whole index back to disk
    pub fn save(&self, repo: &Repo) -> Result<()> {
        let path = repo.index_path();
        let content = toml::to_string_pretty(self)?;
        write_atomic(
            &repo.tmp_path(),
            &path,
            content.as_bytes(),
            repo.config().fsync,
        )?;
        debug!(entries = self.entries.len(), "saved index");
        Ok(())
    }

    /// store `content` and point `path` at it, replacing any earlier entry
    pub fn stage(&mut self, store: &ObjectStore<'_>, path: &str, content: &[u8]) -> Result<Hash> {
        let hash = store.put(content)?;
        if let Some(previous) = self.entries.insert(path.to_string(), hash) {
            if previous != hash {
                debug!(path, %previous, %hash, "restaged path");
            }
        }
        Ok(hash)
    }

    /// drop the entry for `path`
    pub fn unstage(&mut self, path: &str) -> Result<Hash> {
        self.entries
            .remove(path)
            .ok_or_else(|| Error::NotStaged(path.to_string()))
    }

    /// hash staged for `path`
    pub fn get(&self, path: &str) -> Option<&Hash> {
        self.entries.get(path)
    }

    /// the complete staged mapping
    pub fn snapshot(&self) -> BTreeMap<String, Hash> {
        self.entries.clone()
    }

    /// iterate entries in path order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Hash)> {
        self.entries.iter().map(|(p, h)| (p.as_str(), h))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
