//! Binary version information

use crate::error::{Error, Result};
use semver::Version;
use std::fmt;

/// Version of the running binary
pub const BINARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Major and minor version, used to pick version-pinned resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MinorVersion {
    pub major: u64,
    pub minor: u64,
}

impl MinorVersion {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Parse either `1.7` or a full semver string such as `1.7.3-beta.1`
    pub fn parse(version: &str) -> Result<Self> {
        let version = version.trim().trim_start_matches('v');
        if let Ok(full) = Version::parse(version) {
            return Ok(Self::new(full.major, full.minor));
        }
        let (major, minor) = version
            .split_once('.')
            .ok_or_else(|| Error::invalid_version(version))?;
        let major = major.parse().map_err(|_| Error::invalid_version(version))?;
        let minor = minor.parse().map_err(|_| Error::invalid_version(version))?;
        Ok(Self::new(major, minor))
    }

    /// Minor version of the running binary
    pub fn of_binary() -> Result<Self> {
        Self::parse(BINARY_VERSION)
    }
}

impl fmt::Display for MinorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
