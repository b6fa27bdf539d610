//! Release channels and their display names.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Release track a build is published on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Stable release track
    Dev,
    /// Beta track
    Beta,
    /// Developer track
    Developer,
    /// Nightly track
    Nightly,
}

impl Channel {
    /// All known channels
    pub const ALL: [Channel; 4] = [
        Channel::Dev,
        Channel::Beta,
        Channel::Developer,
        Channel::Nightly,
    ];

    /// Identifier used in tags and configuration
    pub fn id(self) -> &'static str {
        match self {
            Channel::Dev => "dev",
            Channel::Beta => "beta",
            Channel::Developer => "developer",
            Channel::Nightly => "nightly",
        }
    }

    /// Human-facing channel name
    pub fn display_name(self) -> &'static str {
        match self {
            Channel::Dev => "Release",
            Channel::Beta => "Beta",
            Channel::Developer => "Developer",
            Channel::Nightly => "Nightly",
        }
    }

    /// Release title for a tag on this channel, e.g. `Beta Channel v1.2.3beta`
    pub fn release_name(self, tag: &str) -> String {
        format!("{} Channel {}", self.display_name(), tag)
    }
}

impl FromStr for Channel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.id() == s.trim())
            .ok_or_else(|| ConfigError::InvalidValue {
                setting: "channel".to_string(),
                value: s.to_string(),
                reason: format!(
                    "expected one of: {}",
                    Channel::ALL.map(Channel::id).join(", ")
                ),
            })
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
