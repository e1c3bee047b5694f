//! Managed-directory fixtures.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pydist_resolve::{Arch, Distribution, Os, Platform, Resolver};
use tempfile::TempDir;

/// Resolver pinned to x86_64 Linux with the default variant.
pub fn linux_resolver() -> Resolver {
    Resolver::new(Platform::new(Os::Linux, Arch::X86_64))
}

/// A temporary managed directory with helpers to lay out installs by hand.
pub struct TestPythons {
    temp_dir: TempDir,
}

impl Default for TestPythons {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPythons {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the managed directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a complete-looking install of `distribution` and return its root.
    pub fn place(&self, distribution: &Distribution) -> PathBuf {
        let root = self.root().join(distribution.name());
        let python_path = root.join(distribution.python_path());
        fs::create_dir_all(python_path.parent().unwrap()).unwrap();
        fs::write(&python_path, distribution.source()).unwrap();
        root
    }

    /// Write a metadata file recording `source` for the install at `name`.
    pub fn write_metadata(&self, name: &str, source: &str) {
        let path = self.root().join(name).join("hatch-dist.json");
        fs::write(path, format!(r#"{{"source": "{source}"}}"#)).unwrap();
    }

    /// Names of everything directly under the managed directory, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Every file under `root` with its bytes, keyed by relative path.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path.strip_prefix(root).unwrap().to_path_buf();
                out.insert(relative, fs::read(&path).unwrap());
            }
        }
    }

    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}
