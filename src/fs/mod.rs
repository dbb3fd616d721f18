pub mod read;
pub mod write;

pub use read::{hash_file, read_file};
pub use write::{fsync_dir, write_atomic};
