use std::path::Path;

use crate::error::Result;
use crate::fs::hash_file;
use crate::object::read_commit;
use crate::refs::read_head;
use crate::repo::Repo;
use crate::types::DiffResult;
use crate::worktree::{full_path, normalize};

/// compare a working file against its entry in the head commit
///
/// only hashes are compared; historic content is never read back.
pub fn diff(repo: &Repo, path: &Path) -> Result<DiffResult> {
    let key = normalize(repo, path)?;
    let current = hash_file(&full_path(repo, &key))?;

    let Some(head) = read_head(repo)? else {
        return Ok(DiffResult::NoPriorCommit);
    };
    let record = read_commit(repo, &head)?;

    let result = match record.files.get(&key) {
        None => DiffResult::FileNotInCommit,
        Some(previous) if *previous == current => DiffResult::Unchanged,
        Some(previous) => DiffResult::Changed {
            previous: *previous,
            current,
        },
    };
    Ok(result)
}
