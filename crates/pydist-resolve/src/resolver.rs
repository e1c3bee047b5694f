//! Name-to-distribution resolution for a given platform.

use crate::distribution::Distribution;
use crate::distributions::{self, ORDERED_DISTRIBUTIONS};
use crate::error::{Error, Result};
use crate::platform::Platform;

/// Resolves distribution names against the known-distributions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    platform: Platform,
    variant: Option<String>,
}

impl Resolver {
    /// Create a resolver for `platform` using the OS default variant.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            variant: None,
        }
    }

    /// Create a resolver for the running platform.
    ///
    /// The build variant is taken from `HATCH_PYTHON_VARIANT_<OS>` when set.
    pub fn from_env() -> Result<Self> {
        let platform = Platform::current()?;
        Ok(Self::from_lookup(platform, |key| std::env::var(key).ok()))
    }

    /// Create a resolver reading the variant override through `lookup`.
    pub fn from_lookup(platform: Platform, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let variant = lookup(&platform.os.variant_env_var());
        Self::new(platform).with_variant(variant)
    }

    /// Override the build variant. Empty values select the OS default.
    pub fn with_variant(mut self, variant: Option<String>) -> Self {
        self.variant = variant
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty());
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The variant used for lookups: the override, else the OS default.
    pub fn variant(&self) -> &str {
        self.variant
            .as_deref()
            .unwrap_or_else(|| self.platform.os.default_variant())
    }

    /// Every known name in canonical order.
    pub fn known_distributions(&self) -> &'static [&'static str] {
        ORDERED_DISTRIBUTIONS
    }

    /// Resolve `name` to a concrete distribution.
    ///
    /// With `source`, the table lookup is skipped and the version is parsed
    /// from the URL; this is how already-installed sources are re-read.
    pub fn resolve(&self, name: &str, source: Option<&str>) -> Result<Distribution> {
        if !distributions::is_known(name) {
            return Err(Error::UnknownDistribution(name.to_string()));
        }

        if let Some(source) = source {
            return Distribution::from_source(name, source, self.platform.os);
        }

        let variant = self.variant();
        let entry = distributions::lookup(name, self.platform.os, self.platform.arch, variant)
            .ok_or_else(|| Error::NoMatchingBuild {
                name: name.to_string(),
                os: self.platform.os.to_string(),
                arch: self.platform.arch.to_string(),
                variant: variant.to_string(),
            })?;

        tracing::debug!(name, variant, source = %entry.url, "Resolved distribution");
        Distribution::from_source(name, &entry.url, self.platform.os)
    }
}
