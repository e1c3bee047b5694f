//! Tunables for filesystem operations that may need to wait on the OS.

use std::time::Duration;

/// Timing and durability knobs shared by atomic writes and directory removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying an advisory lock before giving up.
    pub lock_timeout: Duration,
    /// Whether to fsync written files before the final rename.
    pub enable_fsync: bool,
    /// Upper bound on waiting for a removed directory to disappear.
    ///
    /// Some platforms release directory handles asynchronously, so a tree can
    /// still be reported as present right after `remove_dir_all` returns.
    pub removal_timeout: Duration,
    /// First delay between removal checks; later delays back off exponentially.
    pub poll_interval: Duration,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
            removal_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl RobustnessConfig {
    /// Build the exponential backoff used for bounded polling.
    pub(crate) fn backoff(&self, max_elapsed: Duration) -> backoff::ExponentialBackoff {
        backoff::ExponentialBackoffBuilder::new()
            .with_initial_interval(self.poll_interval)
            .with_max_interval(self.poll_interval * 8)
            .with_max_elapsed_time(Some(max_elapsed))
            .build()
    }
}
