//! Installation and tracking of managed Python distributions.
//!
//! [`PythonManager`] owns a directory of installed distributions, one
//! subdirectory per canonical name. Installs are swapped into place with a
//! backup so a failed replacement never leaves a half-written tree behind.

pub mod error;
pub mod installed;
pub mod logging;
pub mod manager;
pub mod transport;

pub use error::{BoxError, Error, Result};
pub use installed::{DistMetadata, InstalledDistribution, METADATA_FILENAME};
pub use manager::PythonManager;
pub use transport::{Downloader, Unpacker};

pub use pydist_fs::RobustnessConfig;
pub use pydist_resolve::{Distribution, Resolver};
