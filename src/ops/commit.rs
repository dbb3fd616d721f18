use chrono::Utc;
use tracing::info;

use crate::error::Result;
use crate::hash::Hash;
use crate::index::Index;
use crate::object::{read_commit, write_commit};
use crate::refs::{read_head, write_head};
use crate::repo::Repo;
use crate::types::CommitRecord;

/// snapshot the staging index into a new commit and move head to it
///
/// an empty index is allowed and yields a commit with no files. if writing
/// head fails the commit object stays in the store unreferenced.
pub fn commit(repo: &Repo, message: &str) -> Result<Hash> {
    let _lock = repo.lock()?;

    let files = Index::load(repo)?.snapshot();

    // get parent commit if head exists
    let parent = match read_head(repo)? {
        Some(hash) => Some((hash, read_commit(repo, &hash)?)),
        None => None,
    };

    // timestamps never run backwards along the chain
    let mut timestamp = Utc::now();
    if let Some((_, prev)) = &parent {
        if prev.timestamp > timestamp {
            timestamp = prev.timestamp;
        }
    }

    let record = CommitRecord::with_timestamp(
        message,
        timestamp,
        files,
        parent.map(|(hash, _)| hash),
    );
    let commit_hash = write_commit(repo, &record)?;

    write_head(repo, &commit_hash)?;

    info!(hash = %commit_hash, files = record.files.len(), "created commit");
    Ok(commit_hash)
}
