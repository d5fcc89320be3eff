//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing the key-value store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Engine-specific failure (quota exceeded, unavailable, ...).
    #[error("Store operation failed: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
