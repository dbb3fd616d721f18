use crate::hash::Hash;

/// result of comparing a working file against the head commit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffResult {
    /// head does not exist yet
    NoPriorCommit,
    /// the head commit has no entry for this path
    FileNotInCommit,
    Unchanged,
    Changed { previous: Hash, current: Hash },
}
