//! A distribution that exists on disk under the managed directory.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use pydist_fs::io;
use pydist_resolve::{Distribution, Resolver};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Name of the file recording what was installed, at the install root.
pub const METADATA_FILENAME: &str = "hatch-dist.json";

/// Contents of the metadata file.
///
/// Only `source` is interpreted. Other keys are kept so files written by newer
/// versions survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistMetadata {
    /// URL the installed archive was downloaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DistMetadata {
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// One installed distribution.
///
/// `distribution` is the freshest resolution for this name, which is not
/// necessarily what is on disk; the installed source lives in the metadata.
#[derive(Debug)]
pub struct InstalledDistribution {
    path: PathBuf,
    distribution: Distribution,
    resolver: Resolver,
    python_path: OnceCell<PathBuf>,
    metadata_file: OnceCell<PathBuf>,
    metadata: OnceCell<DistMetadata>,
}

impl InstalledDistribution {
    pub(crate) fn new(path: PathBuf, distribution: Distribution, resolver: Resolver) -> Self {
        Self {
            path,
            distribution,
            resolver,
            python_path: OnceCell::new(),
            metadata_file: OnceCell::new(),
            metadata: OnceCell::new(),
        }
    }

    /// Root directory of the installation.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical distribution name.
    pub fn name(&self) -> &str {
        self.distribution.name()
    }

    /// The most recently resolved distribution for this name.
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// Absolute path of the interpreter executable.
    pub fn python_path(&self) -> &Path {
        self.python_path.get_or_init(|| self.path.join(self.distribution.python_path()))
    }

    pub fn metadata_file(&self) -> &Path {
        self.metadata_file.get_or_init(|| self.path.join(METADATA_FILENAME))
    }

    /// Installed metadata, read from disk on first access.
    ///
    /// A missing file yields empty metadata.
    pub fn metadata(&self) -> Result<&DistMetadata> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }

        let loaded = io::load_json::<DistMetadata>(self.metadata_file())?.unwrap_or_default();
        Ok(self.metadata.get_or_init(|| loaded))
    }

    /// Whether a newer build than the installed one is known.
    ///
    /// Without a recorded source there is nothing to prove the install is
    /// current, so the answer is `true`. A recorded source that cannot be
    /// parsed is an error.
    pub fn needs_update(&self) -> Result<bool> {
        let Some(source) = self
            .metadata()?
            .source
            .as_deref()
            .filter(|source| !source.is_empty())
        else {
            return Ok(true);
        };

        let installed = self.resolver.resolve(self.name(), Some(source))?;
        let stale = self.distribution.version() > installed.version();

        tracing::debug!(
            name = self.name(),
            installed = %installed.version(),
            available = %self.distribution.version(),
            stale,
            "Checked distribution for updates"
        );
        Ok(stale)
    }
}
