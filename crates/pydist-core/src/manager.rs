//! The managed directory of installed distributions.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use pydist_fs::{RobustnessConfig, dir, io};
use pydist_resolve::{Distribution, Resolver, canonical_index, is_known};

use crate::installed::{DistMetadata, InstalledDistribution};
use crate::transport::{Downloader, Unpacker};
use crate::{Error, Result};

/// Installs, lists and removes distributions under one directory.
///
/// Each installation lives in an immediate subdirectory named after its
/// canonical distribution name. Concurrent installs into the same directory
/// are not coordinated; callers must serialize them.
pub struct PythonManager<D, U> {
    directory: PathBuf,
    resolver: Resolver,
    downloader: D,
    unpacker: U,
    robustness: RobustnessConfig,
}

impl<D, U> PythonManager<D, U> {
    /// Create a manager for `directory`, which need not exist yet.
    pub fn new(
        directory: impl Into<PathBuf>,
        resolver: Resolver,
        downloader: D,
        unpacker: U,
    ) -> Self {
        Self {
            directory: directory.into(),
            resolver,
            downloader,
            unpacker,
            robustness: RobustnessConfig::default(),
        }
    }

    /// Replace the default filesystem timing settings.
    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    /// Per-user location for managed distributions.
    pub fn default_directory() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("pydist").join("pythons"))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// List complete installations in canonical order.
    ///
    /// Subdirectories that are not named after a known distribution, or that
    /// lack the interpreter executable, are skipped.
    pub fn get_installed(&self) -> Result<IndexMap<String, InstalledDistribution>> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(e) => return Err(Error::io(&self.directory, e)),
        };

        let mut found: Vec<(PathBuf, Distribution)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&self.directory, e))?;
            let path = entry.path();
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !path.is_dir() || !is_known(&name) {
                continue;
            }

            let distribution = self.resolver.resolve(&name, None)?;
            if path.join(distribution.python_path()).is_file() {
                found.push((path, distribution));
            } else {
                tracing::debug!(path = %path.display(), "Skipping incomplete installation");
            }
        }

        found.sort_by_key(|(_, distribution)| canonical_index(distribution.name()));

        Ok(found
            .into_iter()
            .map(|(path, distribution)| {
                let name = distribution.name().to_string();
                let installed =
                    InstalledDistribution::new(path, distribution, self.resolver.clone());
                (name, installed)
            })
            .collect())
    }

    /// Delete an installation and wait until it is gone from disk.
    pub fn remove(&self, installed: InstalledDistribution) -> Result<()> {
        dir::remove_dir_and_wait(installed.path(), self.robustness)?;
        tracing::info!(name = installed.name(), "Removed distribution");
        Ok(())
    }

    /// Move a freshly unpacked tree onto `target`, keeping a rollback copy.
    ///
    /// A backup of any existing installation is kept at `<target>.bak` until
    /// the next install of the same name. If the new tree cannot be placed,
    /// the backup is moved back before the error is returned.
    fn swap_into_place(&self, unpacked: &Path, target: &Path) -> Result<()> {
        self.swap_into_place_with(unpacked, target, dir::rename_dir)
    }

    fn swap_into_place_with<R>(&self, unpacked: &Path, target: &Path, rename: R) -> Result<()>
    where
        R: Fn(&Path, &Path) -> pydist_fs::Result<()>,
    {
        let backup = backup_path(target);

        if backup.is_dir() {
            tracing::debug!(path = %backup.display(), "Removing leftover backup");
            dir::remove_dir_and_wait(&backup, self.robustness)?;
        }

        if target.is_dir() {
            tracing::debug!(path = %target.display(), "Backing up existing installation");
            rename(target, &backup)?;
        }

        let rename_error = match rename(unpacked, target) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        tracing::warn!(error = %rename_error, "Rename failed, falling back to copy");
        let move_error = match dir::move_dir(unpacked, target) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        if let Err(e) = dir::remove_dir_and_wait(target, self.robustness) {
            tracing::error!(error = %e, "Failed to clean up partial installation");
        }

        if backup.is_dir() {
            match rename(&backup, target) {
                Ok(()) => {
                    tracing::warn!(path = %target.display(), "Restored previous installation");
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        backup = %backup.display(),
                        "Failed to restore backup"
                    );
                }
            }
        }

        Err(Error::InstallSwap {
            target: target.to_path_buf(),
            source: move_error,
        })
    }
}

impl<D: Downloader, U: Unpacker> PythonManager<D, U> {
    /// Download, unpack and swap in the distribution named `identifier`.
    ///
    /// Scratch files live in a temporary directory inside the managed
    /// directory, which is removed on every exit path.
    pub fn install(&self, identifier: &str) -> Result<InstalledDistribution> {
        let distribution = self.resolver.resolve(identifier, None)?;
        let target = self.directory.join(distribution.name());

        fs::create_dir_all(&self.directory).map_err(|e| Error::io(&self.directory, e))?;

        {
            let temp_dir = tempfile::Builder::new()
                .prefix(".pydist-")
                .tempdir_in(&self.directory)
                .map_err(|e| Error::io(&self.directory, e))?;
            let archive_path = temp_dir.path().join(distribution.archive_name());
            let unpack_path = temp_dir.path().join(distribution.name());

            tracing::debug!(source = distribution.source(), "Downloading distribution");
            self.downloader
                .download(distribution.source(), &archive_path)
                .map_err(Error::Download)?;

            self.unpacker
                .unpack(&distribution, &archive_path, &unpack_path)
                .map_err(Error::Unpack)?;

            self.swap_into_place(&unpack_path, &target)?;
        }

        let installed = InstalledDistribution::new(target, distribution, self.resolver.clone());
        let metadata = DistMetadata::with_source(installed.distribution().source());
        io::save_json(installed.metadata_file(), &metadata, self.robustness)?;

        tracing::info!(
            name = installed.name(),
            version = %installed.distribution().version(),
            "Installed distribution"
        );
        Ok(installed)
    }
}

fn backup_path(target: &Path) -> PathBuf {
    // `with_extension` would turn "3.10" into "3.bak"
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pydist_resolve::{Arch, Os, Platform};

    fn bare_manager(directory: &Path) -> PythonManager<(), ()> {
        let resolver = Resolver::new(Platform::new(Os::Linux, Arch::X86_64));
        PythonManager::new(directory, resolver, (), ())
    }

    /// Refuses to rename `refused`, like a move across devices.
    fn rename_refusing(refused: &Path) -> impl Fn(&Path, &Path) -> pydist_fs::Result<()> + '_ {
        move |from: &Path, to: &Path| {
            if from == refused {
                let e = std::io::Error::other("cross-device link");
                return Err(pydist_fs::Error::io(to, e));
            }
            dir::rename_dir(from, to)
        }
    }

    #[test]
    fn test_swap_falls_back_to_copy_when_rename_fails() {
        let temp = tempfile::tempdir().unwrap();
        let unpacked = temp.path().join(".pydist-scratch").join("3.11");
        let target = temp.path().join("3.11");
        fs::create_dir_all(unpacked.join("python")).unwrap();
        fs::write(unpacked.join("python").join("marker"), "new").unwrap();
        fs::create_dir_all(target.join("python")).unwrap();
        fs::write(target.join("python").join("marker"), "old").unwrap();

        bare_manager(temp.path())
            .swap_into_place_with(&unpacked, &target, rename_refusing(&unpacked))
            .unwrap();

        assert_eq!(fs::read_to_string(target.join("python/marker")).unwrap(), "new");
        assert_eq!(
            fs::read_to_string(temp.path().join("3.11.bak/python/marker")).unwrap(),
            "old"
        );
        assert!(!unpacked.exists());
    }

    #[test]
    fn test_swap_restores_backup_when_copy_also_fails() {
        let temp = tempfile::tempdir().unwrap();
        let unpacked = temp.path().join(".pydist-scratch").join("3.11");
        let target = temp.path().join("3.11");
        fs::create_dir_all(target.join("python")).unwrap();
        fs::write(target.join("python").join("marker"), "old").unwrap();

        let err = bare_manager(temp.path())
            .swap_into_place_with(&unpacked, &target, rename_refusing(&unpacked))
            .unwrap_err();

        assert!(matches!(err, Error::InstallSwap { .. }), "{err}");
        assert_eq!(fs::read_to_string(target.join("python/marker")).unwrap(), "old");
        assert!(!temp.path().join("3.11.bak").exists());
    }

    #[test]
    fn test_backup_path_keeps_full_name() {
        assert_eq!(
            backup_path(Path::new("/pythons/3.10")),
            PathBuf::from("/pythons/3.10.bak")
        );
        assert_eq!(
            backup_path(Path::new("/pythons/pypy3.9")),
            PathBuf::from("/pythons/pypy3.9.bak")
        );
    }

    #[test]
    fn test_default_directory_is_namespaced() {
        if let Some(dir) = PythonManager::<(), ()>::default_directory() {
            assert!(dir.ends_with("pydist/pythons"));
        }
    }
}
