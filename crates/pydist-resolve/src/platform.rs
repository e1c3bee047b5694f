//! Platform facts used to pick a build from the distribution table.

use crate::error::{Error, Result};

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Macos,
    Windows,
}

impl Os {
    /// Get the string representation of the OS family.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        }
    }

    /// The OS family this process is running on, if supported.
    pub fn current() -> Option<Self> {
        Self::from_consts(std::env::consts::OS)
    }

    fn from_consts(os: &str) -> Option<Self> {
        match os {
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::Macos),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }

    /// Environment variable that overrides the build variant on this OS.
    pub fn variant_env_var(&self) -> String {
        format!("HATCH_PYTHON_VARIANT_{}", self.as_str().to_uppercase())
    }

    /// Variant selected when no override is set.
    pub fn default_variant(&self) -> &'static str {
        match self {
            Self::Linux => "v3",
            Self::Windows => "shared",
            Self::Macos => "",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Arch {
    /// Get the string representation of the architecture.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }

    /// The architecture this process is running on, if supported.
    pub fn current() -> Option<Self> {
        Self::from_consts(std::env::consts::ARCH)
    }

    fn from_consts(arch: &str) -> Option<Self> {
        match arch {
            "x86_64" => Some(Self::X86_64),
            "aarch64" => Some(Self::Aarch64),
            _ => None,
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The OS and architecture a distribution is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detect the platform of the running process.
    pub fn current() -> Result<Self> {
        match (Os::current(), Arch::current()) {
            (Some(os), Some(arch)) => Ok(Self { os, arch }),
            _ => Err(Error::UnsupportedPlatform {
                os: std::env::consts::OS.to_string(),
                arch: std::env::consts::ARCH.to_string(),
            }),
        }
    }
}
