//! vcs - minimal local version control
//!
//! content-addressed storage of file snapshots for a single working directory.
//! no branches, no trees, no remotes: one flat path -> hash mapping per commit
//! and a single head pointer.
//!
//! # Core concepts
//!
//! - **Object**: immutable bytes stored under their SHA-256 hash
//! - **Index**: the staged path -> hash mapping for the next commit
//! - **Commit**: a full snapshot of the index with message, timestamp and parent
//! - **Head**: the hash of the most recent commit
//!
//! # Layout
//!
//! ```text
//! <root>/.vcs/objects/<hash>   raw object bytes
//! <root>/.vcs/refs/HEAD        hex hash of the latest commit
//! <root>/.vcs/index            staged entries (TOML)
//! <root>/.vcs/config.toml      repository configuration
//! ```
//!
//! # Example usage
//!
//! ```no_run
//! use vcs::{ops, DiffResult, Repo};
//! use std::path::Path;
//!
//! let repo = Repo::init(Path::new("/path/to/work")).unwrap().repo;
//!
//! ops::stage(&repo, Path::new("notes.txt")).unwrap();
//! let hash = ops::commit(&repo, "initial commit").unwrap();
//!
//! match ops::diff(&repo, Path::new("notes.txt")).unwrap() {
//!     DiffResult::Unchanged => println!("clean at {}", hash),
//!     other => println!("{:?}", other),
//! }
//! ```

mod config;
mod error;
mod hash;
mod index;
mod object;
mod refs;
mod repo;
mod store;

pub mod fs;
pub mod ops;
pub mod types;
pub mod worktree;

pub use config::Config;
pub use error::{Error, Result};
pub use hash::{compute_hash, ContentHasher, Hash};
pub use index::Index;
pub use object::{read_commit, write_commit};
pub use refs::{read_head, resolve, write_head};
pub use repo::{InitOutcome, Repo, RepoLock, VCS_DIR};
pub use store::ObjectStore;
pub use types::{CommitRecord, DiffResult};
