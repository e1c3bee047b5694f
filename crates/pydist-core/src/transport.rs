//! Seams for the collaborators that fetch and extract archives.
//!
//! The manager never interprets their errors; whatever they return is
//! surfaced unchanged through [`Error::Download`](crate::Error::Download) and
//! [`Error::Unpack`](crate::Error::Unpack).

use std::path::Path;

use pydist_resolve::Distribution;

use crate::BoxError;

/// Fetches a URL to a local file.
pub trait Downloader {
    /// Download `url` into the file `destination`, following redirects.
    fn download(&self, url: &str, destination: &Path) -> Result<(), BoxError>;
}

/// Extracts a downloaded archive.
pub trait Unpacker {
    /// Extract `archive` into the directory `destination`.
    ///
    /// `distribution` identifies the archive format and expected layout.
    fn unpack(
        &self,
        distribution: &Distribution,
        archive: &Path,
        destination: &Path,
    ) -> Result<(), BoxError>;
}

impl<T: Downloader + ?Sized> Downloader for &T {
    fn download(&self, url: &str, destination: &Path) -> Result<(), BoxError> {
        (**self).download(url, destination)
    }
}

impl<T: Unpacker + ?Sized> Unpacker for &T {
    fn unpack(
        &self,
        distribution: &Distribution,
        archive: &Path,
        destination: &Path,
    ) -> Result<(), BoxError> {
        (**self).unpack(distribution, archive, destination)
    }
}
