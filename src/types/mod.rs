mod commit;
mod diff;

pub use commit::CommitRecord;
pub use diff::DiffResult;
