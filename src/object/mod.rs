pub mod commit;

pub use commit::{read_commit, write_commit};
