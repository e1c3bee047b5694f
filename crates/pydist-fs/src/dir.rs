//! Directory-level operations used by the install swap protocol.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::{Error, Result, RobustnessConfig};

/// Remove a directory tree and wait until it is observably gone.
///
/// A tree that still reports as existing right after a successful removal is
/// treated as a transient condition and polled, bounded by
/// `config.removal_timeout`. Any other removal failure is returned as is.
/// Removing a path that does not exist succeeds immediately.
pub fn remove_dir_and_wait(path: &Path, config: RobustnessConfig) -> Result<()> {
    backoff::retry(config.backoff(config.removal_timeout), || {
        if fs::symlink_metadata(path).is_err() {
            return Ok(());
        }

        match fs::remove_dir_all(path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(backoff::Error::permanent(Error::io(path, e))),
        }

        if path.exists() {
            tracing::debug!(path = %path.display(), "Removed path still visible, waiting");
            Err(backoff::Error::transient(Error::RemovalTimeout {
                path: path.to_path_buf(),
                timeout: config.removal_timeout,
            }))
        } else {
            Ok(())
        }
    })
    .map_err(|e| match e {
        backoff::Error::Permanent(err) => err,
        backoff::Error::Transient { err, .. } => err,
    })
}

/// Rename a directory in place. Atomic when both paths share a volume.
pub fn rename_dir(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|e| Error::io(to, e))
}

/// Move a directory by copying it recursively and removing the source.
///
/// This is the fallback for renames the OS refuses, such as across devices.
/// On failure the destination may be partially written; callers own cleanup.
pub fn move_dir(from: &Path, to: &Path) -> Result<()> {
    copy_dir_all(from, to)?;
    fs::remove_dir_all(from).map_err(|e| Error::io(from, e))
}

/// Recursively copy `from` into a new directory at `to`.
///
/// Symbolic links are recreated rather than followed on Unix.
pub fn copy_dir_all(from: &Path, to: &Path) -> Result<()> {
    let metadata = fs::metadata(from).map_err(|e| Error::io(from, e))?;
    if !metadata.is_dir() {
        return Err(Error::io(
            from,
            std::io::Error::new(ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    fs::create_dir_all(to).map_err(|e| Error::io(to, e))?;

    for entry in fs::read_dir(from).map_err(|e| Error::io(from, e))? {
        let entry = entry.map_err(|e| Error::io(from, e))?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| Error::io(&source, e))?;

        if file_type.is_dir() {
            copy_dir_all(&source, &target)?;
        } else if file_type.is_symlink() {
            copy_symlink(&source, &target)?;
        } else {
            fs::copy(&source, &target).map_err(|e| Error::io(&target, e))?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    let link = fs::read_link(source).map_err(|e| Error::io(source, e))?;
    std::os::unix::fs::symlink(&link, target).map_err(|e| Error::io(target, e))
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    if source.is_dir() {
        copy_dir_all(source, target)
    } else {
        fs::copy(source, target)
            .map(|_| ())
            .map_err(|e| Error::io(target, e))
    }
}
