//! In-process stand-ins for the download and unpack collaborators.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use pydist_core::{BoxError, Downloader, Unpacker};
use pydist_resolve::Distribution;

/// Writes the requested URL into the archive file instead of fetching it.
#[derive(Debug, Default)]
pub struct FakeDownloader {
    fail: bool,
    urls: RefCell<Vec<String>>,
    archives: RefCell<Vec<PathBuf>>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A downloader whose every call fails with "connection refused".
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// URLs requested so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }

    /// Archive paths written (or attempted) so far.
    pub fn archives(&self) -> Vec<PathBuf> {
        self.archives.borrow().clone()
    }
}

impl Downloader for FakeDownloader {
    fn download(&self, url: &str, destination: &Path) -> Result<(), BoxError> {
        self.urls.borrow_mut().push(url.to_string());
        self.archives.borrow_mut().push(destination.to_path_buf());

        if self.fail {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }

        fs::write(destination, url)?;
        Ok(())
    }
}

/// What [`FakeUnpacker`] does with an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnpackMode {
    /// Create the interpreter at the distribution's expected path.
    #[default]
    Layout,
    /// Report success without creating anything, so the swap has nothing to move.
    Nothing,
    /// Fail as a corrupt archive would.
    Fail,
}

/// Produces the minimal tree a real archive would unpack to.
///
/// The interpreter file's content is the archive's content, which for
/// [`FakeDownloader`] is the source URL.
#[derive(Debug, Default)]
pub struct FakeUnpacker {
    mode: UnpackMode,
}

impl FakeUnpacker {
    pub fn new(mode: UnpackMode) -> Self {
        Self { mode }
    }
}

impl Unpacker for FakeUnpacker {
    fn unpack(
        &self,
        distribution: &Distribution,
        archive: &Path,
        destination: &Path,
    ) -> Result<(), BoxError> {
        match self.mode {
            UnpackMode::Layout => {
                let content = fs::read(archive)?;
                let python_path = destination.join(distribution.python_path());
                if let Some(parent) = python_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(python_path, content)?;
                Ok(())
            }
            UnpackMode::Nothing => Ok(()),
            UnpackMode::Fail => Err(format!("corrupt archive: {}", archive.display()).into()),
        }
    }
}
