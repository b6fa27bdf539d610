//! Publisher configuration.
//!
//! All process-boundary settings are collected into a [`PublisherConfig`]
//! once at startup. Validation happens here so that missing tokens, unknown
//! channels and malformed versions fail before any network call is made.

mod channel;
mod retry;

pub use channel::Channel;
pub use retry::RetryConfig;

use std::path::PathBuf;

use url::Url;

use crate::error::{ConfigError, ReleaseError, Result};
use crate::version::ReleaseVersion;

/// Default GitHub REST API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com/";

/// Default GitHub asset upload endpoint
pub const DEFAULT_UPLOADS_URL: &str = "https://uploads.github.com/";

/// Placeholder body for newly created drafts
pub const PLACEHOLDER_BODY: &str = "Release notes coming shortly";

/// How an existing release for the target tag is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReconcileMode {
    /// Any existing release for the tag is a conflict
    Strict,
    /// Reuse a single existing draft; published releases conflict
    #[default]
    Merge,
}

/// Unvalidated settings as read from flags and environment
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    /// API token
    pub token: Option<String>,
    /// Repository as `owner/repo`
    pub repo: Option<String>,
    /// Version string
    pub version: Option<String>,
    /// Channel identifier
    pub channel: Option<String>,
    /// Target architecture label
    pub arch: Option<String>,
    /// Enable destructive recovery
    pub force: bool,
    /// Draft reconciliation policy
    pub mode: ReconcileMode,
    /// Directory scanned for artifacts
    pub artifacts_dir: Option<PathBuf>,
    /// File whose contents become the release body
    pub notes: Option<PathBuf>,
    /// REST API base URL override
    pub api_url: Option<String>,
    /// Upload endpoint override
    pub uploads_url: Option<String>,
}

/// Validated configuration passed into the orchestrator
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// API token
    pub token: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Release version
    pub version: ReleaseVersion,
    /// Release channel
    pub channel: Channel,
    /// Target architecture label
    pub arch: String,
    /// Enable destructive recovery (delete-then-recreate, asset replacement)
    pub force: bool,
    /// Draft reconciliation policy
    pub mode: ReconcileMode,
    /// Directory scanned for artifacts
    pub artifacts_dir: Option<PathBuf>,
    /// Body for newly created drafts
    pub release_body: String,
    /// REST API base URL
    pub api_url: Url,
    /// Upload endpoint base URL
    pub uploads_url: Url,
    /// Retry limits
    pub retry: RetryConfig,
}

impl PublisherConfig {
    /// Validate raw settings into a configuration
    pub fn from_settings(raw: RawSettings, retry: RetryConfig) -> Result<Self> {
        let token = raw
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                setting: "token".to_string(),
                hint: "Set GH_TOKEN or GITHUB_TOKEN environment variable or use --token"
                    .to_string(),
            })?;

        let (owner, repo) = parse_github_repo(raw.repo.as_deref())?;

        let channel = raw
            .channel
            .ok_or_else(|| ConfigError::Missing {
                setting: "channel".to_string(),
                hint: "Set CHANNEL or use --channel".to_string(),
            })?
            .parse::<Channel>()?;

        let version = raw.version.ok_or_else(|| ConfigError::Missing {
            setting: "version".to_string(),
            hint: "Set RELEASE_VERSION or use --version-string".to_string(),
        })?;
        let version = ReleaseVersion::parse(&version)?;

        let arch = raw
            .arch
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| default_arch().to_string());

        let release_body = match raw.notes {
            Some(path) => {
                std::fs::read_to_string(&path).map_err(|e| ConfigError::InvalidValue {
                    setting: "notes".to_string(),
                    value: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
            None => PLACEHOLDER_BODY.to_string(),
        };

        let api_url = parse_base_url("api url", raw.api_url.as_deref(), DEFAULT_API_URL)?;
        let uploads_url =
            parse_base_url("uploads url", raw.uploads_url.as_deref(), DEFAULT_UPLOADS_URL)?;

        retry.validate()?;

        Ok(Self {
            token,
            owner,
            repo,
            version,
            channel,
            arch,
            force: raw.force,
            mode: raw.mode,
            artifacts_dir: raw.artifacts_dir,
            release_body,
            api_url,
            uploads_url,
            retry,
        })
    }

    /// Release tag for the configured version and channel
    pub fn tag(&self) -> String {
        self.version.tag(self.channel)
    }

    /// Release title for the configured tag
    pub fn release_name(&self) -> String {
        self.channel.release_name(&self.tag())
    }

    /// Artifact directory, required by the upload command
    pub fn require_artifacts_dir(&self) -> Result<&std::path::Path> {
        self.artifacts_dir.as_deref().ok_or_else(|| {
            ReleaseError::Configuration(ConfigError::Missing {
                setting: "artifacts dir".to_string(),
                hint: "Set ARTIFACTS_DIR or use --artifacts-dir".to_string(),
            })
        })
    }
}

/// Architecture label for the host platform
pub fn default_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        other => other,
    }
}

/// Parse GitHub repository string into owner/repo tuple
fn parse_github_repo(repo_str: Option<&str>) -> std::result::Result<(String, String), ConfigError> {
    let repo = repo_str.ok_or_else(|| ConfigError::Missing {
        setting: "repo".to_string(),
        hint: "Set RELEASE_REPO or use --repo. Format: owner/repo".to_string(),
    })?;

    let parts: Vec<&str> = repo.trim().split('/').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::InvalidValue {
            setting: "repo".to_string(),
            value: repo.to_string(),
            reason: "expected owner/repo".to_string(),
        });
    }

    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Parse a base URL, forcing a trailing slash so relative joins keep the path
fn parse_base_url(
    setting: &str,
    value: Option<&str>,
    default: &str,
) -> std::result::Result<Url, ConfigError> {
    let raw = value.unwrap_or(default);
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    Url::parse(&normalized).map_err(|e| ConfigError::InvalidValue {
        setting: setting.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
