//! Error types for layout storage

use std::path::PathBuf;

/// Errors from option backends and the layout store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure in a file-backed store
    #[error("io error at {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded for storage
    #[error("could not serialize {key}: {source}")]
    Serialize {
        /// Option key
        key: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Backend refused the write or delete
    #[error("backend rejected {key}: {reason}")]
    Rejected {
        /// Option key
        key: String,
        /// Backend explanation
        reason: String,
    },

    /// Stored value does not decode as a layout
    #[error("stored record {key} is corrupt: {source}")]
    Corrupt {
        /// Option key
        key: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Key contains characters the backend cannot store
    #[error("invalid option key: {0:?}")]
    InvalidKey(String),

    /// Role cannot be used as a partition key
    #[error("invalid role: {0:?}")]
    InvalidRole(String),
}

impl StoreError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create rejection error
    pub fn rejected(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
