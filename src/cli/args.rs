//! Command line argument parsing and validation.
//!
//! Every setting can come from a flag or its environment variable; the
//! result is turned into [`RawSettings`] and validated once.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{RawSettings, ReconcileMode};

/// Publish build artifacts to GitHub draft releases
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_release_publisher",
    version,
    about = "Publish build artifacts to GitHub draft releases",
    long_about = "Create or reuse a draft release for a version tag, upload build artifacts to it,
and promote the draft once every platform has uploaded.

Usage:
  kodegen_release_publisher --repo owner/repo --version-string 1.2.3 --channel beta upload --artifacts-dir dist
  kodegen_release_publisher --repo owner/repo --version-string 1.2.3 --channel beta publish
  kodegen_release_publisher --repo owner/repo --version-string 1.2.3 --channel beta delete"
)]
pub struct Args {
    /// Command to execute
    #[command(subcommand)]
    pub command: Command,

    /// GitHub token (falls back to GITHUB_TOKEN)
    #[arg(long, env = "GH_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Repository as owner/repo
    #[arg(long, env = "RELEASE_REPO", global = true)]
    pub repo: Option<String>,

    /// Version being released, e.g. 1.2.3
    #[arg(long = "version-string", env = "RELEASE_VERSION", global = true)]
    pub version_string: Option<String>,

    /// Release channel: dev, beta, developer or nightly
    #[arg(long, env = "CHANNEL", global = true)]
    pub channel: Option<String>,

    /// Target architecture label (defaults to the host architecture)
    #[arg(long, env = "TARGET_ARCH", global = true)]
    pub arch: Option<String>,

    /// Delete conflicting releases and replace existing assets
    #[arg(long, global = true)]
    pub force: bool,

    /// GitHub API base URL (GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL", global = true)]
    pub api_url: Option<String>,

    /// GitHub uploads base URL (GitHub Enterprise)
    #[arg(long, env = "GITHUB_UPLOADS_URL", global = true)]
    pub uploads_url: Option<String>,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Reconcile the draft release and upload every artifact
    Upload {
        /// Directory scanned recursively for artifacts
        #[arg(long, env = "ARTIFACTS_DIR")]
        artifacts_dir: Option<PathBuf>,

        /// How an existing release for the tag is treated
        #[arg(long, value_enum, default_value_t = ReconcileMode::Merge)]
        mode: ReconcileMode,

        /// File whose contents become the body of a new draft
        #[arg(long)]
        notes: Option<PathBuf>,
    },

    /// Promote the draft release to a published prerelease
    Publish,

    /// Delete the release for the tag (recovery)
    Delete,
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Upload { .. } => "upload",
            Command::Publish => "publish",
            Command::Delete => "delete",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Collect unvalidated settings from flags and environment
    pub fn to_settings(&self) -> RawSettings {
        let token = self
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok());

        let mut settings = RawSettings {
            token,
            repo: self.repo.clone(),
            version: self.version_string.clone(),
            channel: self.channel.clone(),
            arch: self.arch.clone(),
            force: self.force,
            api_url: self.api_url.clone(),
            uploads_url: self.uploads_url.clone(),
            ..RawSettings::default()
        };

        if let Command::Upload {
            artifacts_dir,
            mode,
            notes,
        } = &self.command
        {
            settings.artifacts_dir = artifacts_dir.clone();
            settings.mode = *mode;
            settings.notes = notes.clone();
        }

        settings
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(quiet),
        }
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print section header
    pub fn section(&self, title: &str) {
        let _ = self.output.section(title);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.quiet)
    }
}
