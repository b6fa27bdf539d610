//! Version strings, release tags and commit tags.
//!
//! A release version is a dot-separated list of at least three numeric
//! components. Tags combine the version with the channel identifier
//! (`v1.2.3` + `dev` → `v1.2.3dev`); commit tags wildcard the patch
//! component (`1.2.3` → `1.2.x`).

use std::fmt;
use std::str::FromStr;

use crate::config::Channel;
use crate::error::{ReleaseError, Result};

/// Minimum number of numeric components in a release version
const MIN_COMPONENTS: usize = 3;

/// A validated release version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    raw: String,
}

impl ReleaseVersion {
    /// Parse and validate a version string
    pub fn parse(version: &str) -> Result<Self> {
        let version = version.trim();
        let mut count = 0;

        for part in version.split('.') {
            part.parse::<u64>().map_err(|_| ReleaseError::Invalid {
                version: version.to_string(),
                reason: format!("component '{}' is not numeric", part),
            })?;
            count += 1;
        }

        if count < MIN_COMPONENTS {
            return Err(ReleaseError::Invalid {
                version: version.to_string(),
                reason: format!(
                    "expected at least {} dot-separated components, found {}",
                    MIN_COMPONENTS, count
                ),
            });
        }

        Ok(Self {
            raw: version.to_string(),
        })
    }

    /// Release tag for this version on the given channel
    pub fn tag(&self, channel: Channel) -> String {
        release_tag(&self.raw, channel)
    }

    /// Commit tag pinning this version's release lineage
    pub fn commit_tag(&self) -> Result<String> {
        derive_commit_tag(&self.raw)
    }
}

impl FromStr for ReleaseVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compose the release tag: `v<version><channel>`
pub fn release_tag(version: &str, channel: Channel) -> String {
    format!("v{}{}", version, channel.id())
}

/// Derive the commit tag from a version string.
///
/// The version must split into exactly three parts on `.`; the third is
/// replaced with a literal `x`.
pub fn derive_commit_tag(version: &str) -> Result<String> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return Err(ReleaseError::Invalid {
            version: version.to_string(),
            reason: format!(
                "commit tag requires exactly 3 version components, found {}",
                parts.len()
            ),
        });
    }

    Ok(format!("{}.{}.x", parts[0], parts[1]))
}
