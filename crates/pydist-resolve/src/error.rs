/// Errors that can occur while resolving a distribution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The name is not in the known-distributions table.
    #[error("Unknown distribution: {0}")]
    UnknownDistribution(String),

    /// A source URL does not match the pattern of its distribution family.
    #[error("unable to parse source '{url}' for distribution '{name}': {reason}")]
    UnparsableSource {
        name: String,
        url: String,
        reason: String,
    },

    /// A version string does not have an `[N!]X[.Y...]` shape.
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// The table has the name but no build for this platform and variant.
    #[error("no build of '{name}' for {os}/{arch} (variant: {variant})")]
    NoMatchingBuild {
        name: String,
        os: String,
        arch: String,
        variant: String,
    },

    /// The running OS or CPU architecture has no distributions at all.
    #[error("unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },
}

pub type Result<T> = std::result::Result<T, Error>;
