use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::fs::read_file;
use crate::hash::Hash;
use crate::index::Index;
use crate::repo::Repo;
use crate::worktree::{full_path, list_files, normalize};

/// stage one working-directory file for the next commit
pub fn stage(repo: &Repo, path: &Path) -> Result<Hash> {
    let _lock = repo.lock()?;

    let key = normalize(repo, path)?;
    let content = read_file(&full_path(repo, &key))?;

    let mut index = Index::load(repo)?;
    let hash = index.stage(&repo.store(), &key, &content)?;
    index.save(repo)?;

    debug!(path = %key, %hash, "staged");
    Ok(hash)
}

/// stage every file in the working tree, writing the index once
pub fn stage_all(repo: &Repo) -> Result<Vec<(String, Hash)>> {
    let _lock = repo.lock()?;

    let store = repo.store();
    let mut index = Index::load(repo)?;
    let mut staged = Vec::new();

    for key in list_files(repo)? {
        let content = read_file(&full_path(repo, &key))?;
        let hash = index.stage(&store, &key, &content)?;
        staged.push((key, hash));
    }

    index.save(repo)?;
    debug!(count = staged.len(), "staged working tree");
    Ok(staged)
}

/// remove a path from the staging index
///
/// the working file is not touched and need not exist.
pub fn unstage(repo: &Repo, path: &Path) -> Result<Hash> {
    let _lock = repo.lock()?;

    let key = normalize(repo, path)?;
    let mut index = Index::load(repo)?;
    let hash = index.unstage(&key)?;
    index.save(repo)?;

    debug!(path = %key, "unstaged");
    Ok(hash)
}
