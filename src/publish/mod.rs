//! Release publishing: draft reconciliation, asset upload and promotion.
//!
//! [`ReleasePublisher`] reconciles local build state (version, channel,
//! artifacts) with the releases held by a [`ReleaseApi`]. Every operation
//! re-reads remote state instead of caching it; another actor may modify the
//! repository between calls.

mod draft;
mod retry;
mod transition;
mod upload;

pub use retry::{RetryPolicy, execute_with_recovery, execute_with_retry};
pub use upload::{UploadOutcome, UploadSummary, asset_name_for, check_asset_names};

use crate::config::{Channel, PublisherConfig, ReconcileMode, RetryConfig};
use crate::error::Result;
use crate::github::{Release, ReleaseApi};
use crate::version::ReleaseVersion;

/// Publishes build artifacts to draft releases and promotes them
pub struct ReleasePublisher<A> {
    api: A,
    version: ReleaseVersion,
    channel: Channel,
    arch: String,
    mode: ReconcileMode,
    force: bool,
    release_body: String,
    retry: RetryConfig,
}

impl<A: ReleaseApi> ReleasePublisher<A> {
    /// Create a publisher over `api` using validated configuration
    pub fn new(api: A, config: &PublisherConfig) -> Self {
        Self {
            api,
            version: config.version.clone(),
            channel: config.channel,
            arch: config.arch.clone(),
            mode: config.mode,
            force: config.force,
            release_body: config.release_body.clone(),
            retry: config.retry.clone(),
        }
    }

    /// The underlying release API
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Tag for the configured version and channel
    pub fn tag(&self) -> String {
        self.version.tag(self.channel)
    }

    /// Find all releases whose tag is exactly `tag`.
    ///
    /// Drafts are excluded unless `include_drafts` is set. The result is a
    /// point-in-time snapshot in no particular order.
    pub async fn find_releases_by_tag(
        &self,
        tag: &str,
        include_drafts: bool,
    ) -> Result<Vec<Release>> {
        let releases = self.api.list_releases().await?;
        let matches = filter_by_tag(releases, tag, include_drafts);
        log::debug!(
            "Found {} release(s) tagged {} (drafts included: {})",
            matches.len(),
            tag,
            include_drafts
        );
        Ok(matches)
    }

    fn api_policy(&self) -> RetryPolicy {
        RetryPolicy::transient(self.retry.release_api).with_base_delay(self.retry.base_delay)
    }

    fn upload_policy(&self) -> RetryPolicy {
        RetryPolicy::transient(self.retry.file_uploads).with_base_delay(self.retry.base_delay)
    }
}

/// Keep releases tagged exactly `tag`, dropping drafts unless requested
pub fn filter_by_tag(releases: Vec<Release>, tag: &str, include_drafts: bool) -> Vec<Release> {
    releases
        .into_iter()
        .filter(|release| release.tag_name == tag)
        .filter(|release| include_drafts || !release.draft)
        .collect()
}
