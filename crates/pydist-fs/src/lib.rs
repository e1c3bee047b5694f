//! Filesystem primitives for managed Python distributions
//!
//! Provides atomic metadata writes, bounded directory removal, and the
//! rename-or-copy directory move used by the install swap.

pub mod config;
pub mod dir;
pub mod error;
pub mod io;

pub use config::RobustnessConfig;
pub use error::{Error, Result};
