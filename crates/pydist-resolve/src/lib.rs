//! Resolution of standalone Python distributions.
//!
//! Maps a logical name such as `3.11` or `pypy3.10` plus the running
//! platform to a concrete [`Distribution`]: download URL, comparable version,
//! archive name and the relative path of the interpreter inside the archive.

pub mod distribution;
pub mod distributions;
pub mod error;
pub mod platform;
pub mod resolver;
pub mod version;

pub use distribution::{Distribution, Family};
pub use distributions::{ORDERED_DISTRIBUTIONS, canonical_index, is_known};
pub use error::{Error, Result};
pub use platform::{Arch, Os, Platform};
pub use resolver::Resolver;
pub use version::Version;
