//! Epoch-aware version ordering.
//!
//! Versions follow the PEP 440 public shape `[N!]X[.Y[.Z...]][suffix]`, but
//! only the epoch and the numeric release segment take part in ordering.
//! Pre, post, dev and local suffixes are accepted and ignored, so
//! `7.3.12rc1` and `7.3.12` compare equal.
//!
//! # Examples
//!
//! ```
//! use pydist_resolve::Version;
//!
//! let old: Version = "20230116".parse().unwrap();
//! let new: Version = "20230507".parse().unwrap();
//! assert!(new > old);
//!
//! // Epoch wins over release
//! let epoch: Version = "1!1.0".parse().unwrap();
//! assert!(epoch > new);
//! ```

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^\s*v?
        (?:(?P<epoch>\d+)!)?
        (?P<release>\d+(?:\.\d+)*)
        (?:[-_.]?(?:a|b|c|rc|alpha|beta|pre|preview|post|rev|r|dev)[-_.]?\d*)*
        (?:\+[a-z0-9]+(?:[-_.][a-z0-9]+)*)?
        \s*$",
    )
    .unwrap()
});

/// A parsed version: an epoch plus the numeric release segment.
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    raw: String,
}

impl Version {
    /// Parse a version string.
    pub fn parse(version: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidVersion {
            version: version.to_string(),
            reason: reason.to_string(),
        };

        let captures = VERSION_PATTERN
            .captures(version)
            .ok_or_else(|| invalid("expected [N!]X[.Y...] with an optional suffix"))?;

        let epoch = match captures.name("epoch") {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| invalid("epoch out of range"))?,
            None => 0,
        };

        let release = captures["release"]
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| invalid("release component out of range"))?;

        Ok(Self {
            epoch,
            release,
            raw: version.trim().to_string(),
        })
    }

    /// The epoch, `0` unless written as `N!`.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The dotted numeric release, without epoch or suffixes.
    pub fn base_version(&self) -> String {
        self.release
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// The string this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch.cmp(&other.epoch).then_with(|| {
            let len = self.release.len().max(other.release.len());
            (0..len)
                .map(|i| {
                    let a = self.release.get(i).copied().unwrap_or(0);
                    let b = other.release.get(i).copied().unwrap_or(0);
                    a.cmp(&b)
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
