//! In-memory release service for tests
//!
//! Implements `ReleaseApi` over a mutex-guarded release list, records every
//! call, and can inject transient failures into creates and uploads.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use kodegen_release_publisher::config::{RawSettings, ReconcileMode, RetryConfig};
use kodegen_release_publisher::github::{NewRelease, ReleasePatch};
use kodegen_release_publisher::{ApiError, Asset, PublisherConfig, Release, ReleaseApi};

/// A recorded API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListReleases,
    CreateRelease(String),
    PatchRelease(u64),
    DeleteRelease(u64),
    ListAssets(u64),
    UploadAsset(String),
    DeleteAsset(u64),
}

#[derive(Default)]
struct State {
    releases: Vec<Release>,
    next_id: u64,
    calls: Vec<Call>,
    create_failures: u32,
    upload_failures: u32,
    leave_partial_upload: bool,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn release_mut(&mut self, release_id: u64, operation: &str) -> Result<&mut Release, ApiError> {
        self.releases
            .iter_mut()
            .find(|release| release.id == release_id)
            .ok_or_else(|| ApiError::NotFound {
                operation: operation.to_string(),
            })
    }
}

/// Release service held entirely in memory
#[derive(Default)]
pub struct InMemoryReleaseApi {
    state: Mutex<State>,
}

impl InMemoryReleaseApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a release and return its id
    pub fn with_release(&self, tag: &str, draft: bool) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.releases.push(release(id, tag, draft));
        id
    }

    /// Seed an asset on an existing release and return its id
    pub fn with_asset(&self, release_id: u64, name: &str) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let release = state.release_mut(release_id, "seed").unwrap();
        release.assets.push(asset(id, name, 0));
        id
    }

    /// Make the next `count` create calls fail with a transient error
    pub fn fail_creates(&self, count: u32) {
        self.state.lock().unwrap().create_failures = count;
    }

    /// Make the next `count` uploads fail with a transient error.
    ///
    /// With `leave_partial`, each failed upload still leaves an asset behind.
    pub fn fail_uploads(&self, count: u32, leave_partial: bool) {
        let mut state = self.state.lock().unwrap();
        state.upload_failures = count;
        state.leave_partial_upload = leave_partial;
    }

    pub fn releases(&self) -> Vec<Release> {
        self.state.lock().unwrap().releases.clone()
    }

    pub fn release(&self, release_id: u64) -> Release {
        self.releases()
            .into_iter()
            .find(|release| release.id == release_id)
            .expect("release exists")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }
}

#[async_trait]
impl ReleaseApi for InMemoryReleaseApi {
    async fn list_releases(&self) -> Result<Vec<Release>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListReleases);
        Ok(state.releases.clone())
    }

    async fn create_release(&self, new: &NewRelease) -> Result<Release, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateRelease(new.tag_name.clone()));

        if state.create_failures > 0 {
            state.create_failures -= 1;
            return Err(transient("create_release"));
        }

        let id = state.next_id();
        let mut created = release(id, &new.tag_name, new.draft);
        created.name = Some(new.name.clone());
        created.body = Some(new.body.clone());
        created.prerelease = new.prerelease;
        state.releases.push(created.clone());
        Ok(created)
    }

    async fn patch_release(&self, release_id: u64, patch: &ReleasePatch) -> Result<Release, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::PatchRelease(release_id));

        let release = state.release_mut(release_id, "patch_release")?;
        if let Some(draft) = patch.draft {
            release.draft = draft;
        }
        if let Some(prerelease) = patch.prerelease {
            release.prerelease = prerelease;
        }
        if let Some(tag_name) = &patch.tag_name {
            release.tag_name = tag_name.clone();
        }
        if let Some(commitish) = &patch.target_commitish {
            release.target_commitish = Some(commitish.clone());
        }
        Ok(release.clone())
    }

    async fn delete_release(&self, release_id: u64) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteRelease(release_id));

        let before = state.releases.len();
        state.releases.retain(|release| release.id != release_id);
        if state.releases.len() == before {
            return Err(ApiError::NotFound {
                operation: "delete_release".to_string(),
            });
        }
        Ok(())
    }

    async fn list_assets(&self, release_id: u64) -> Result<Vec<Asset>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListAssets(release_id));
        Ok(state.release_mut(release_id, "list_assets")?.assets.clone())
    }

    async fn upload_asset(
        &self,
        release_id: u64,
        name: &str,
        content_type: &str,
        content: Bytes,
    ) -> Result<Asset, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UploadAsset(name.to_string()));
        assert_eq!(content_type, "application/octet-stream");

        let id = state.next_id();
        let failing = state.upload_failures > 0;
        let leave_partial = state.leave_partial_upload;
        if failing {
            state.upload_failures -= 1;
        }

        let release = state.release_mut(release_id, "upload_asset")?;
        if release.assets.iter().any(|asset| asset.name == name) {
            return Err(ApiError::Rejected {
                operation: "upload_asset".to_string(),
                status: 422,
                message: "Validation Failed: already_exists".to_string(),
            });
        }

        if failing {
            if leave_partial {
                release.assets.push(asset(id, name, 0));
            }
            return Err(transient("upload_asset"));
        }

        let uploaded = asset(id, name, content.len() as u64);
        release.assets.push(uploaded.clone());
        Ok(uploaded)
    }

    async fn delete_asset(&self, asset_id: u64) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteAsset(asset_id));

        for release in state.releases.iter_mut() {
            let before = release.assets.len();
            release.assets.retain(|asset| asset.id != asset_id);
            if release.assets.len() != before {
                return Ok(());
            }
        }
        Err(ApiError::NotFound {
            operation: "delete_asset".to_string(),
        })
    }
}

pub fn release(id: u64, tag: &str, draft: bool) -> Release {
    Release {
        id,
        tag_name: tag.to_string(),
        draft,
        prerelease: false,
        name: None,
        body: None,
        target_commitish: None,
        html_url: Some(format!("https://github.com/cyrup-ai/desktop/releases/{}", id)),
        published_at: None,
        assets: Vec::new(),
    }
}

fn asset(id: u64, name: &str, size: u64) -> Asset {
    Asset {
        id,
        name: name.to_string(),
        content_type: "application/octet-stream".to_string(),
        size,
        browser_download_url: None,
    }
}

fn transient(operation: &str) -> ApiError {
    ApiError::Transient {
        operation: operation.to_string(),
        reason: "connection reset by peer".to_string(),
    }
}

/// Configuration for version 1.0.0 on the dev channel (tag `v1.0.0dev`)
pub fn config(mode: ReconcileMode, force: bool) -> PublisherConfig {
    config_for_version("1.0.0", mode, force)
}

pub fn config_for_version(version: &str, mode: ReconcileMode, force: bool) -> PublisherConfig {
    PublisherConfig::from_settings(
        RawSettings {
            token: Some("ghp_test".to_string()),
            repo: Some("cyrup-ai/desktop".to_string()),
            version: Some(version.to_string()),
            channel: Some("dev".to_string()),
            arch: Some("x64".to_string()),
            force,
            mode,
            ..RawSettings::default()
        },
        RetryConfig::immediate(),
    )
    .expect("valid test configuration")
}
