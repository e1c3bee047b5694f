//! Error types for pydist-fs

use std::path::PathBuf;
use std::time::Duration;

/// Result type for pydist-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pydist-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Timed out after {timeout:?} waiting for {path} to be removed")]
    RemovalTimeout { path: PathBuf, timeout: Duration },

    #[error("Failed to parse metadata at {path}: {message}")]
    MetadataParse { path: PathBuf, message: String },

    #[error("Failed to serialize metadata for {path}: {message}")]
    MetadataSerialize { path: PathBuf, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
