//! Table of known distributions.
//!
//! Each entry is keyed by name, OS, architecture and build variant. An empty
//! variant marks a build that applies regardless of the requested variant.

use std::sync::LazyLock;

use crate::platform::{Arch, Os};

/// Every known distribution name, in the order they are always presented.
pub const ORDERED_DISTRIBUTIONS: &[&str] = &[
    "3.8", "3.9", "3.10", "3.11", "pypy2.7", "pypy3.9", "pypy3.10",
];

const CPYTHON_RELEASE: &str = "20230507";

const CPYTHON_BUILDS: &[(&str, &str)] = &[
    ("3.8", "3.8.16"),
    ("3.9", "3.9.16"),
    ("3.10", "3.10.11"),
    ("3.11", "3.11.3"),
];

/// (os, arch, variant, target triple with variant suffix)
const CPYTHON_TARGETS: &[(Os, Arch, &str, &str)] = &[
    (Os::Linux, Arch::X86_64, "v1", "x86_64_v1-unknown-linux-gnu"),
    (Os::Linux, Arch::X86_64, "v2", "x86_64_v2-unknown-linux-gnu"),
    (Os::Linux, Arch::X86_64, "v3", "x86_64_v3-unknown-linux-gnu"),
    (Os::Linux, Arch::X86_64, "v4", "x86_64_v4-unknown-linux-gnu"),
    (Os::Linux, Arch::Aarch64, "", "aarch64-unknown-linux-gnu"),
    (Os::Windows, Arch::X86_64, "shared", "x86_64-pc-windows-msvc-shared"),
    (Os::Windows, Arch::X86_64, "static", "x86_64-pc-windows-msvc-static"),
    (Os::Macos, Arch::X86_64, "", "x86_64-apple-darwin"),
    (Os::Macos, Arch::Aarch64, "", "aarch64-apple-darwin"),
];

const PYPY_RELEASE: &str = "7.3.12";

const PYPY_BUILDS: &[&str] = &["pypy2.7", "pypy3.9", "pypy3.10"];

/// (os, arch, platform tag, archive extension)
const PYPY_TARGETS: &[(Os, Arch, &str, &str)] = &[
    (Os::Linux, Arch::X86_64, "linux64", "tar.bz2"),
    (Os::Linux, Arch::Aarch64, "aarch64", "tar.bz2"),
    (Os::Windows, Arch::X86_64, "win64", "zip"),
    (Os::Macos, Arch::X86_64, "macos_x86_64", "tar.bz2"),
    (Os::Macos, Arch::Aarch64, "macos_arm64", "tar.bz2"),
];

/// One downloadable build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionEntry {
    pub name: &'static str,
    pub os: Os,
    pub arch: Arch,
    pub variant: &'static str,
    pub url: String,
}

static DISTRIBUTIONS: LazyLock<Vec<DistributionEntry>> = LazyLock::new(|| {
    let cpython = CPYTHON_BUILDS.iter().flat_map(|&(name, version)| {
        CPYTHON_TARGETS
            .iter()
            .map(move |&(os, arch, variant, triple)| DistributionEntry {
                name,
                os,
                arch,
                variant,
                url: format!(
                    "https://github.com/indygreg/python-build-standalone/releases/download/\
                     {CPYTHON_RELEASE}/cpython-{version}%2B{CPYTHON_RELEASE}-{triple}-install_only.tar.gz"
                ),
            })
    });

    let pypy = PYPY_BUILDS.iter().flat_map(|&name| {
        PYPY_TARGETS
            .iter()
            .map(move |&(os, arch, tag, extension)| DistributionEntry {
                name,
                os,
                arch,
                variant: "",
                url: format!(
                    "https://downloads.python.org/pypy/{name}-v{PYPY_RELEASE}-{tag}.{extension}"
                ),
            })
    });

    cpython.chain(pypy).collect()
});

/// Whether `name` is a known distribution.
pub fn is_known(name: &str) -> bool {
    ORDERED_DISTRIBUTIONS.contains(&name)
}

/// Position of `name` in the canonical ordering.
pub fn canonical_index(name: &str) -> Option<usize> {
    ORDERED_DISTRIBUTIONS.iter().position(|known| *known == name)
}

/// Find the build for `name` on `os`/`arch`.
///
/// An entry with exactly `variant` wins; otherwise a variant-less entry for the
/// same platform is used.
pub fn lookup(
    name: &str,
    os: Os,
    arch: Arch,
    variant: &str,
) -> Option<&'static DistributionEntry> {
    let candidates = DISTRIBUTIONS
        .iter()
        .filter(|entry| entry.name == name && entry.os == os && entry.arch == arch);

    let mut fallback = None;
    for entry in candidates {
        if entry.variant == variant {
            return Some(entry);
        }
        if entry.variant.is_empty() && fallback.is_none() {
            fallback = Some(entry);
        }
    }
    fallback
}
