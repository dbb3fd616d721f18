//! high-level operations on a repository

mod commit;
mod diff;
mod fsck;
mod log;
mod stage;

pub use commit::commit;
pub use diff::diff;
pub use fsck::{fsck, CorruptObject, FsckReport, MissingObject};
pub use log::{log, LogEntry};
pub use stage::{stage, stage_all, unstage};
