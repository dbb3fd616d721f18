use std::fs;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::write_atomic;
use crate::hash::Hash;
use crate::repo::Repo;

/// read the head reference, `None` before the first commit
pub fn read_head(repo: &Repo) -> Result<Option<Hash>> {
    let path = repo.head_path();

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io { path, source: e }),
    };

    Hash::from_hex(content.trim()).map(Some)
}

/// point head at `hash`
///
/// the file holds the bare hex digest with no trailing newline.
pub fn write_head(repo: &Repo, hash: &Hash) -> Result<()> {
    let refs = repo.refs_path();
    fs::create_dir_all(&refs).with_path(&refs)?;

    write_atomic(
        &repo.tmp_path(),
        &repo.head_path(),
        hash.to_hex().as_bytes(),
        repo.config().fsync,
    )
}

/// resolve a full hex hash or the literal `HEAD`
pub fn resolve(repo: &Repo, rev: &str) -> Result<Hash> {
    if rev == "HEAD" {
        return read_head(repo)?.ok_or(Error::NoCommits);
    }
    Hash::from_hex(rev)
}
