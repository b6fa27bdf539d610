//! GitHub integration for release operations
//!
//! [`ReleaseApi`] is the seam between the publishing logic and the releases
//! service. [`GitHubClient`] implements it over the GitHub REST API.

mod client;
mod models;

pub use client::GitHubClient;
pub use models::{Asset, NewRelease, Release, ReleasePatch};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ApiError;

/// Content type used for every uploaded artifact
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Operations the publisher needs from a releases service.
///
/// The repository is bound at construction. Implementations must report
/// connection-level failures as [`ApiError::Transient`] and missing entities
/// as [`ApiError::NotFound`].
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    /// List every release of the repository, drafts included
    async fn list_releases(&self) -> Result<Vec<Release>, ApiError>;

    /// Create a release
    async fn create_release(&self, release: &NewRelease) -> Result<Release, ApiError>;

    /// Update selected fields of a release
    async fn patch_release(&self, release_id: u64, patch: &ReleasePatch)
    -> Result<Release, ApiError>;

    /// Delete a release
    async fn delete_release(&self, release_id: u64) -> Result<(), ApiError>;

    /// List the assets of a release
    async fn list_assets(&self, release_id: u64) -> Result<Vec<Asset>, ApiError>;

    /// Upload binary content as a new asset
    async fn upload_asset(
        &self,
        release_id: u64,
        name: &str,
        content_type: &str,
        content: Bytes,
    ) -> Result<Asset, ApiError>;

    /// Delete an asset
    async fn delete_asset(&self, asset_id: u64) -> Result<(), ApiError>;
}
