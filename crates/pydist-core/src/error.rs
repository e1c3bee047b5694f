//! Error types for pydist-core

use std::path::PathBuf;

/// Error type produced by download and unpack collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for pydist-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing installed distributions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] pydist_resolve::Error),

    #[error(transparent)]
    Fs(#[from] pydist_fs::Error),

    /// Failure reported by the download collaborator, passed through as-is.
    #[error(transparent)]
    Download(BoxError),

    /// Failure reported by the unpack collaborator, passed through as-is.
    #[error(transparent)]
    Unpack(BoxError),

    /// Neither rename nor copy could place the new tree; any previous
    /// installation has been restored.
    #[error("Failed to install into {target}: {source}")]
    InstallSwap {
        target: PathBuf,
        #[source]
        source: pydist_fs::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
