use crate::error::Result;
use crate::hash::Hash;
use crate::repo::Repo;
use crate::types::CommitRecord;

/// write a commit to the object store
///
/// commits share the object namespace with file content; the hash is computed
/// over the serialized JSON bytes.
pub fn write_commit(repo: &Repo, commit: &CommitRecord) -> Result<Hash> {
    let bytes = commit.to_bytes()?;
    repo.store().put(&bytes)
}

/// read a commit from the object store
pub fn read_commit(repo: &Repo, hash: &Hash) -> Result<CommitRecord> {
    let bytes = repo.store().get(hash)?;
    CommitRecord::from_bytes(hash, &bytes)
}
