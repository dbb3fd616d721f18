use std::collections::HashSet;

use crate::error::Result;
use crate::hash::Hash;
use crate::object::read_commit;
use crate::refs::read_head;
use crate::repo::Repo;
use crate::types::CommitRecord;

/// commit with its hash for log output
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub hash: Hash,
    pub commit: CommitRecord,
}

/// walk the parent chain from head, newest first
///
/// an empty repository has an empty log.
pub fn log(repo: &Repo, max_count: Option<usize>) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    let mut next = read_head(repo)?;
    let mut visited = HashSet::new();

    while let Some(hash) = next {
        if let Some(max) = max_count {
            if entries.len() >= max {
                break;
            }
        }
        if !visited.insert(hash) {
            break;
        }

        let commit = read_commit(repo, &hash)?;
        next = commit.parent;
        entries.push(LogEntry { hash, commit });
    }

    Ok(entries)
}
