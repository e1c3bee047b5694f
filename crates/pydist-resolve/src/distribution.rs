//! The resolved, immutable description of one downloadable build.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::platform::Os;
use crate::version::Version;

static CPYTHON_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^cpython-(?P<python>\d+\.\d+\.\d+)(?:%2B|\+)(?P<build>\d+)-").unwrap()
});

static PYPY_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>pypy\d+\.\d+)-v(?P<version>\d+\.\d+\.\d+)-").unwrap()
});

/// Build family, which fixes the URL pattern and the archive layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// python-build-standalone `install_only` archives
    CPythonStandalone,
    /// Official PyPy release archives
    PyPy,
}

impl Family {
    /// Family a distribution name belongs to.
    pub fn of(name: &str) -> Self {
        if name.starts_with("pypy") {
            Self::PyPy
        } else {
            Self::CPythonStandalone
        }
    }
}

/// A named, versioned, platform-specific interpreter artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    name: String,
    family: Family,
    version: Version,
    source: String,
    archive_name: String,
    python_path: PathBuf,
}

impl Distribution {
    /// Describe the build downloadable from `source`.
    ///
    /// The version is read out of the URL itself, so any URL that does not
    /// follow its family's naming scheme is rejected.
    pub fn from_source(name: &str, source: &str, os: Os) -> Result<Self> {
        let family = Family::of(name);
        let archive_name = source
            .rsplit_once('/')
            .map_or(source, |(_, tail)| tail)
            .to_string();

        let unparsable = |reason: String| Error::UnparsableSource {
            name: name.to_string(),
            url: source.to_string(),
            reason,
        };

        let version = match family {
            Family::CPythonStandalone => {
                let captures = CPYTHON_SOURCE.captures(&archive_name).ok_or_else(|| {
                    unparsable("expected 'cpython-<version>+<build>-...' archive".into())
                })?;
                let python = &captures["python"];
                if !python
                    .strip_prefix(name)
                    .is_some_and(|rest| rest.starts_with('.'))
                {
                    return Err(unparsable(format!("archive is for Python {python}")));
                }
                Version::parse(&captures["build"])?
            }
            Family::PyPy => {
                let captures = PYPY_SOURCE.captures(&archive_name).ok_or_else(|| {
                    unparsable("expected '<name>-v<version>-...' archive".into())
                })?;
                if &captures["name"] != name {
                    return Err(unparsable(format!("archive is for {}", &captures["name"])));
                }
                Version::parse(&captures["version"])?
            }
        };

        let python_path = python_path(family, &archive_name, os);

        Ok(Self {
            name: name.to_string(),
            family,
            version,
            source: source.to_string(),
            archive_name,
            python_path,
        })
    }

    /// Canonical name, e.g. `3.11` or `pypy3.10`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Download URL.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// File name of the downloaded archive.
    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    /// Interpreter location relative to the unpacked distribution root.
    pub fn python_path(&self) -> &std::path::Path {
        &self.python_path
    }
}

fn python_path(family: Family, archive_name: &str, os: Os) -> PathBuf {
    match family {
        Family::CPythonStandalone => match os {
            Os::Windows => ["python", "python.exe"].iter().collect(),
            _ => ["python", "bin", "python3"].iter().collect(),
        },
        Family::PyPy => {
            let directory = [".tar.bz2", ".zip"]
                .iter()
                .find_map(|extension| archive_name.strip_suffix(extension))
                .unwrap_or(archive_name);
            match os {
                Os::Windows => [directory, "pypy.exe"].iter().collect(),
                _ => [directory, "bin", "pypy"].iter().collect(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const CPYTHON_URL: &str = "https://github.com/indygreg/python-build-standalone/releases/download/20230507/cpython-3.11.3%2B20230507-aarch64-unknown-linux-gnu-install_only.tar.gz";
    const PYPY_URL: &str = "https://downloads.python.org/pypy/pypy3.10-v7.3.12-aarch64.tar.bz2";

    #[test]
    fn test_archive_name_is_url_tail() {
        let dist = Distribution::from_source("pypy3.10", PYPY_URL, Os::Linux).unwrap();
        assert_eq!(dist.archive_name(), "pypy3.10-v7.3.12-aarch64.tar.bz2");
    }

    #[test]
    fn test_cpython_python_path() {
        let dist = Distribution::from_source("3.11", CPYTHON_URL, Os::Linux).unwrap();
        assert_eq!(dist.python_path(), Path::new("python/bin/python3"));
        assert_eq!(dist.family(), Family::CPythonStandalone);

        let dist = Distribution::from_source("3.11", CPYTHON_URL, Os::Windows).unwrap();
        assert_eq!(dist.python_path(), Path::new("python").join("python.exe"));
    }

    #[test]
    fn test_pypy_python_path_uses_archive_stem() {
        let dist = Distribution::from_source("pypy3.10", PYPY_URL, Os::Macos).unwrap();
        assert_eq!(
            dist.python_path(),
            Path::new("pypy3.10-v7.3.12-aarch64").join("bin").join("pypy")
        );

        let url = "https://downloads.python.org/pypy/pypy3.10-v7.3.12-win64.zip";
        let dist = Distribution::from_source("pypy3.10", url, Os::Windows).unwrap();
        assert_eq!(
            dist.python_path(),
            Path::new("pypy3.10-v7.3.12-win64").join("pypy.exe")
        );
    }

    #[test]
    fn test_literal_plus_separator_accepted() {
        let url = "https://example.com/cpython-3.10.11+20230507-x86_64-apple-darwin-install_only.tar.gz";
        let dist = Distribution::from_source("3.10", url, Os::Macos).unwrap();
        assert_eq!(dist.version().base_version(), "20230507");
    }

    #[test]
    fn test_cpython_source_for_other_minor_rejected() {
        // 3.1 must not accept a 3.11 build
        let err = Distribution::from_source("3.1", CPYTHON_URL, Os::Linux).unwrap_err();
        assert!(matches!(err, Error::UnparsableSource { .. }));
    }

    #[test]
    fn test_pypy_source_for_other_name_rejected() {
        let err = Distribution::from_source("pypy3.9", PYPY_URL, Os::Linux).unwrap_err();
        assert!(matches!(err, Error::UnparsableSource { .. }));
    }

    #[test]
    fn test_foreign_url_rejected() {
        let err =
            Distribution::from_source("3.11", "https://example.com/python.tar.gz", Os::Linux)
                .unwrap_err();
        match err {
            Error::UnparsableSource { name, url, .. } => {
                assert_eq!(name, "3.11");
                assert_eq!(url, "https://example.com/python.tar.gz");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
