use std::path::PathBuf;

use crate::Hash;

/// error type for vcs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a vcs repository (no .vcs directory) at {0}")]
    NoRepo(PathBuf),

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("corrupt object: hash mismatch for {0}")]
    CorruptObject(Hash),

    #[error("no commits yet")]
    NoCommits,

    #[error("staging index unavailable at {0}")]
    IndexUnavailable(PathBuf),

    #[error("staging index corrupt at {path}: {message}")]
    IndexCorrupt { path: PathBuf, message: String },

    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("path is outside the repository: {0}")]
    PathOutsideRepo(PathBuf),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("path is not staged: {0}")]
    NotStaged(String),

    #[error("invalid hash hex: {0}")]
    InvalidHashHex(String),

    #[error("cannot decode commit {hash}: {source}")]
    CommitDecode {
        hash: Hash,
        #[source]
        source: serde_json::Error,
    },

    #[error("commit serialization error: {0}")]
    CommitEncode(#[source] serde_json::Error),

    #[error("invalid ignore pattern: {0}")]
    InvalidIgnorePattern(String),

    #[error("repository integrity check failed")]
    IntegrityCheckFailed,

    #[error("lock contention on repository")]
    LockContention,

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
