//! # Kodegen Release Publisher
//!
//! Draft-first publishing of build artifacts to GitHub releases.
//!
//! Each platform build uploads its artifacts to a shared draft release for
//! the version tag; once every platform has uploaded, the draft is promoted
//! to a published prerelease pinned to a commit tag.
//!
//! ## Features
//!
//! - **Draft Reconciliation**: Reuse an existing draft or refuse conflicting state
//! - **Idempotent Uploads**: Already-uploaded assets are skipped or replaced on `--force`
//! - **Retry With Recovery**: Partial uploads are removed before each retry
//! - **Explicit Recovery**: Conflicting releases are only deleted on request
//!
//! ## Usage
//!
//! ```bash
//! kodegen_release_publisher --channel beta --version-string 1.2.3 upload --artifacts-dir dist
//! kodegen_release_publisher --channel beta --version-string 1.2.3 publish
//! kodegen_release_publisher --channel beta --version-string 1.2.3 delete
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod publish;
pub mod version;

// Re-export main types for public API
pub use cli::Args;
pub use config::{Channel, PublisherConfig, ReconcileMode, RetryConfig};
pub use error::{ApiError, ConfigError, ReleaseError, Result};
pub use github::{Asset, GitHubClient, Release, ReleaseApi};
pub use publish::{ReleasePublisher, RetryPolicy, UploadOutcome, UploadSummary};
pub use version::ReleaseVersion;
