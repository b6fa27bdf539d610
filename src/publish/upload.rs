//! Artifact upload with replace-on-retry recovery

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::{ReleasePublisher, execute_with_recovery, execute_with_retry};
use crate::error::{ApiError, ConfigError, ReleaseError, Result};
use crate::github::{Asset, OCTET_STREAM, Release, ReleaseApi};

/// Squirrel update manifest; one per architecture lands on the same release
const RELEASES_MANIFEST: &str = "RELEASES";

/// Result of uploading a single artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The artifact was uploaded as this asset
    Uploaded(Asset),
    /// An asset with the same name already existed and was kept
    Skipped {
        /// Asset name
        name: String,
    },
}

/// Result of uploading a batch of artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    /// Newly uploaded assets, in upload order
    pub uploaded: Vec<Asset>,
    /// Names of artifacts skipped because the release already had them
    pub skipped: Vec<String>,
}

/// Remote asset name for a local artifact.
///
/// The base name is used as-is, except that `RELEASES` becomes
/// `RELEASES-<arch>`.
pub fn asset_name_for(path: &Path, arch: &str) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ReleaseError::Artifact {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "artifact has no UTF-8 file name"),
        })?;

    if file_name == RELEASES_MANIFEST {
        Ok(format!("{}-{}", RELEASES_MANIFEST, arch))
    } else {
        Ok(file_name.to_string())
    }
}

/// Reject artifact sets where two paths map to the same asset name.
///
/// Assets are keyed by name within a release, so a collision would make one
/// upload overwrite or shadow the other.
pub fn check_asset_names(paths: &[PathBuf], arch: &str) -> Result<()> {
    let mut seen: HashMap<String, &Path> = HashMap::with_capacity(paths.len());

    for path in paths {
        let name = asset_name_for(path, arch)?;
        if let Some(first) = seen.get(&name) {
            return Err(ReleaseError::Configuration(ConfigError::InvalidValue {
                setting: "artifacts".to_string(),
                value: name,
                reason: format!(
                    "asset name is shared by {} and {}",
                    first.display(),
                    path.display()
                ),
            }));
        }
        seen.insert(name, path);
    }

    Ok(())
}

impl<A: ReleaseApi> ReleasePublisher<A> {
    /// Check that `paths` map to distinct asset names for this architecture
    pub fn check_artifacts(&self, paths: &[PathBuf]) -> Result<()> {
        check_asset_names(paths, &self.arch)
    }

    /// Upload one artifact to `release`.
    ///
    /// With `force_replace`, existing assets of the same name are deleted
    /// first; otherwise an existing asset means the artifact is skipped.
    /// Transient upload failures are retried; before each retry any asset
    /// left behind by the failed attempt is deleted. The file is re-read on
    /// every attempt.
    pub async fn upload_artifact(
        &self,
        release: &Release,
        path: &Path,
        force_replace: bool,
    ) -> Result<UploadOutcome> {
        let name = asset_name_for(path, &self.arch)?;
        let api = &self.api;
        let release_id = release.id;
        let api_policy = self.api_policy();

        let existing = execute_with_retry(&api_policy, "Asset listing", |_| async move {
            api.list_assets(release_id).await.map_err(ReleaseError::from)
        })
        .await?;

        let same_name: Vec<&Asset> = existing.iter().filter(|asset| asset.name == name).collect();
        if !same_name.is_empty() {
            if !force_replace {
                log::info!("Skipping {} (already uploaded to release {})", name, release_id);
                return Ok(UploadOutcome::Skipped { name });
            }

            for asset in same_name {
                match api.delete_asset(asset.id).await {
                    Ok(()) => log::info!("Replacing asset {} ({})", asset.name, asset.id),
                    Err(ApiError::NotFound { .. }) => {
                        log::debug!("Asset {} already gone", asset.id)
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }

        let name_ref = name.as_str();
        let operation_name = format!("Upload of {}", name);
        let asset = execute_with_recovery(
            &self.upload_policy(),
            &operation_name,
            |_| async move {
                let content = tokio::fs::read(path).await.map_err(|source| {
                    ReleaseError::Artifact {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                api.upload_asset(release_id, name_ref, OCTET_STREAM, Bytes::from(content))
                    .await
                    .map_err(ReleaseError::from)
            },
            |_| async move { remove_assets_named(api, release_id, name_ref).await },
        )
        .await?;

        log::info!(
            "Uploaded {} ({} bytes) to release {}",
            asset.name,
            asset.size,
            release_id
        );
        Ok(UploadOutcome::Uploaded(asset))
    }

    /// Upload artifacts one at a time, in the given order.
    ///
    /// Fails before touching the release when two paths share an asset name.
    pub async fn upload_all(&self, release: &Release, paths: &[PathBuf]) -> Result<UploadSummary> {
        self.check_artifacts(paths)?;

        let mut summary = UploadSummary::default();

        for path in paths {
            match self.upload_artifact(release, path, self.force).await? {
                UploadOutcome::Uploaded(asset) => summary.uploaded.push(asset),
                UploadOutcome::Skipped { name } => summary.skipped.push(name),
            }
        }

        Ok(summary)
    }
}

/// Delete every asset called `name`, re-reading the release's assets first.
///
/// Best-effort per asset: a failed deletion is logged and the rest proceed.
async fn remove_assets_named<A: ReleaseApi>(api: &A, release_id: u64, name: &str) -> Result<()> {
    let assets = api.list_assets(release_id).await?;

    for asset in assets.iter().filter(|asset| asset.name == name) {
        match api.delete_asset(asset.id).await {
            Ok(()) => log::info!("Removed partial upload {} ({})", asset.name, asset.id),
            Err(err) => log::warn!("Could not remove partial upload {}: {}", asset.id, err),
        }
    }

    Ok(())
}
