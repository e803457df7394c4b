//! Artifact names, versions and references.

use crate::error::{CleanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which version of an artifact a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    /// Highest published version.
    Latest,
    /// A specific version number.
    Exact(u32),
}

/// A reference such as `sample.csv:v2`, `sample.csv:latest` or `sample.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRef {
    pub name: String,
    pub version: VersionSpec,
}

impl ArtifactRef {
    /// Reference to the latest version of `name`.
    pub fn latest(name: &str) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            version: VersionSpec::Latest,
        })
    }
}

impl FromStr for ArtifactRef {
    type Err = CleanError;

    /// The name is everything before the last `:`; a reference without a
    /// version means `latest`.
    fn from_str(s: &str) -> Result<Self> {
        let (name, version) = match s.rsplit_once(':') {
            Some((name, tag)) => {
                let version = if tag == "latest" {
                    VersionSpec::Latest
                } else {
                    let n = tag
                        .strip_prefix('v')
                        .and_then(|n| n.parse::<u32>().ok())
                        .ok_or_else(|| CleanError::InvalidArtifactRef(s.to_string()))?;
                    VersionSpec::Exact(n)
                };
                (name, version)
            }
            None => (s, VersionSpec::Latest),
        };
        validate_name(name).map_err(|_| CleanError::InvalidArtifactRef(s.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            VersionSpec::Latest => write!(f, "{}:latest", self.name),
            VersionSpec::Exact(n) => write!(f, "{}:v{}", self.name, n),
        }
    }
}

/// A concrete published artifact version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId {
    pub name: String,
    pub version: u32,
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:v{}", self.name, self.version)
    }
}

impl From<ArtifactId> for ArtifactRef {
    fn from(id: ArtifactId) -> Self {
        ArtifactRef {
            name: id.name,
            version: VersionSpec::Exact(id.version),
        }
    }
}

/// Artifact names become directory names, so they must be a single
/// non-hidden path component.
pub fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', ':'])
        && !name.chars().any(char::is_control);
    if valid {
        Ok(())
    } else {
        Err(CleanError::InvalidParameter(format!(
            "invalid artifact name '{}'",
            name
        )))
    }
}
