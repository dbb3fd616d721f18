use std::collections::HashSet;
use std::fs;

use tracing::warn;

use crate::error::{Error, Result};
use crate::hash::{compute_hash, Hash};
use crate::index::Index;
use crate::object::read_commit;
use crate::refs::read_head;
use crate::repo::Repo;

/// fsck report
#[derive(Debug, Default)]
pub struct FsckReport {
    /// objects checked
    pub objects_checked: usize,
    /// corrupt objects (hash mismatch or undecodable commit)
    pub corrupt_objects: Vec<CorruptObject>,
    /// objects referenced by head, a commit or the index but not stored
    pub missing_objects: Vec<MissingObject>,
    /// stored objects nothing refers to
    pub dangling_objects: Vec<Hash>,
    /// why the staging index could not be read, if it could not
    pub index_error: Option<String>,
}

impl FsckReport {
    pub fn is_ok(&self) -> bool {
        self.corrupt_objects.is_empty()
            && self.missing_objects.is_empty()
            && self.index_error.is_none()
    }
}

#[derive(Debug)]
pub struct CorruptObject {
    pub hash: Hash,
    pub message: String,
}

#[derive(Debug)]
pub struct MissingObject {
    pub hash: Hash,
    pub referenced_by: String,
}

/// verify repository integrity
pub fn fsck(repo: &Repo) -> Result<FsckReport> {
    let store = repo.store();
    let mut report = FsckReport::default();
    let mut corrupt = HashSet::new();

    // re-hash every stored object
    let all_objects = store.list()?;
    for hash in &all_objects {
        report.objects_checked += 1;

        let path = store.object_path(hash);
        let content = fs::read(&path).map_err(|source| Error::Io { path, source })?;
        let actual = compute_hash(&content);
        if actual != *hash {
            warn!(%hash, %actual, "object hash mismatch");
            corrupt.insert(*hash);
            report.corrupt_objects.push(CorruptObject {
                hash: *hash,
                message: format!("hash mismatch: content hashes to {}", actual),
            });
        }
    }

    let mut reachable = HashSet::new();

    // head and the parent chain
    let mut next = read_head(repo)?.map(|h| (h, "HEAD".to_string()));
    while let Some((hash, referenced_by)) = next.take() {
        if !reachable.insert(hash) {
            break;
        }
        if !store.exists(&hash) {
            report.missing_objects.push(MissingObject {
                hash,
                referenced_by,
            });
            break;
        }
        if corrupt.contains(&hash) {
            break;
        }

        let commit = match read_commit(repo, &hash) {
            Ok(commit) => commit,
            Err(Error::CommitDecode { source, .. }) => {
                warn!(%hash, "undecodable commit");
                report.corrupt_objects.push(CorruptObject {
                    hash,
                    message: format!("not a commit record: {}", source),
                });
                break;
            }
            Err(e) => return Err(e),
        };

        for (path, file_hash) in &commit.files {
            reachable.insert(*file_hash);
            if !store.exists(file_hash) {
                report.missing_objects.push(MissingObject {
                    hash: *file_hash,
                    referenced_by: format!("commit {}: {}", hash.short(), path),
                });
            }
        }

        next = commit
            .parent
            .map(|p| (p, format!("parent of {}", hash.short())));
    }

    // staged entries
    match Index::load(repo) {
        Ok(index) => {
            for (path, hash) in index.entries() {
                reachable.insert(*hash);
                if !store.exists(hash) {
                    report.missing_objects.push(MissingObject {
                        hash: *hash,
                        referenced_by: format!("index: {}", path),
                    });
                }
            }
        }
        Err(e @ (Error::IndexUnavailable(_) | Error::IndexCorrupt { .. })) => {
            warn!(error = %e, "unreadable index");
            report.index_error = Some(e.to_string());
        }
        Err(e) => return Err(e),
    }

    report.dangling_objects = all_objects
        .into_iter()
        .filter(|h| !reachable.contains(h))
        .collect();

    for missing in &report.missing_objects {
        warn!(hash = %missing.hash, referenced_by = %missing.referenced_by, "missing object");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{commit, stage};
    use std::path::Path;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap().repo;
        (dir, repo)
    }

    fn populated_repo() -> (tempfile::TempDir, Repo) {
        let (dir, repo) = test_repo();
        fs::write(repo.root().join("a.txt"), "a").unwrap();
        stage(&repo, Path::new("a.txt")).unwrap();
        commit(&repo, "first").unwrap();
        fs::write(repo.root().join("a.txt"), "a2").unwrap();
        stage(&repo, Path::new("a.txt")).unwrap();
        commit(&repo, "second").unwrap();
        (dir, repo)
    }

    #[test]
    fn test_fsck_empty_repo() {
        let (_dir, repo) = test_repo();

        let report = fsck(&repo).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.objects_checked, 0);
    }

    #[test]
    fn test_fsck_healthy_repo() {
        let (_dir, repo) = populated_repo();

        let report = fsck(&repo).unwrap();
        assert!(report.is_ok());
        // two blobs + two commits
        assert_eq!(report.objects_checked, 4);
        assert!(report.dangling_objects.is_empty());
    }

    #[test]
    fn test_fsck_dangling_object() {
        let (_dir, repo) = populated_repo();
        let orphan = repo.store().put(b"orphan").unwrap();

        let report = fsck(&repo).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.dangling_objects, vec![orphan]);
    }

    #[test]
    fn test_fsck_corrupt_object() {
        let (_dir, repo) = populated_repo();
        let blob = crate::hash::compute_hash(b"a2");
        fs::write(repo.store().object_path(&blob), b"tampered").unwrap();

        let report = fsck(&repo).unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.corrupt_objects.len(), 1);
        assert_eq!(report.corrupt_objects[0].hash, blob);
    }

    #[test]
    fn test_fsck_missing_blob() {
        let (_dir, repo) = populated_repo();
        let blob = crate::hash::compute_hash(b"a");
        fs::remove_file(repo.store().object_path(&blob)).unwrap();

        let report = fsck(&repo).unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.missing_objects.len(), 1);
        assert_eq!(report.missing_objects[0].hash, blob);
        assert!(report.missing_objects[0].referenced_by.starts_with("commit "));
    }

    #[test]
    fn test_fsck_missing_head_commit() {
        let (_dir, repo) = test_repo();
        let ghost = crate::hash::compute_hash(b"ghost");
        crate::refs::write_head(&repo, &ghost).unwrap();

        let report = fsck(&repo).unwrap();
        assert_eq!(report.missing_objects.len(), 1);
        assert_eq!(report.missing_objects[0].referenced_by, "HEAD");
    }

    #[test]
    fn test_fsck_head_points_at_blob() {
        let (_dir, repo) = test_repo();
        let blob = repo.store().put(b"not a commit").unwrap();
        crate::refs::write_head(&repo, &blob).unwrap();

        let report = fsck(&repo).unwrap();
        assert_eq!(report.corrupt_objects.len(), 1);
        assert_eq!(report.corrupt_objects[0].hash, blob);
    }

    #[test]
    fn test_fsck_reports_bad_index() {
        let (_dir, repo) = populated_repo();
        fs::write(repo.index_path(), "this is [not toml").unwrap();

        let report = fsck(&repo).unwrap();
        assert!(!report.is_ok());
        assert!(report.index_error.is_some());
        // the commit chain is still verified
        assert_eq!(report.objects_checked, 4);
        assert!(report.corrupt_objects.is_empty());

        fs::remove_file(repo.index_path()).unwrap();
        let report = fsck(&repo).unwrap();
        assert!(report.index_error.unwrap().contains("unavailable"));
    }
}
