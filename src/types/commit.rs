use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::Hash;

/// a snapshot of the staging index with a message and timestamp
///
/// `files` is the full staged mapping, not a delta. serialized as JSON with a
/// fixed field order and sorted paths, so equal records produce equal bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// commit message
    pub message: String,
    /// creation time, RFC 3339 in UTC
    pub timestamp: DateTime<Utc>,
    /// repository-relative path -> content hash
    pub files: BTreeMap<String, Hash>,
    /// previous head, absent for the first commit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Hash>,
}

impl CommitRecord {
    /// create a commit with explicit timestamp
    pub fn with_timestamp(
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
        files: BTreeMap<String, Hash>,
        parent: Option<Hash>,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp,
            files,
            parent,
        }
    }

    /// is this the first commit (no parent)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// serialize to the bytes stored in the object store
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Error::CommitEncode)
    }

    /// decode a stored commit object
    pub fn from_bytes(hash: &Hash, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|source| Error::CommitDecode {
            hash: *hash,
            source,
        })
    }
}
