//! Upload command: reconcile the draft, then upload every artifact.

use crate::artifacts::collect_artifacts;
use crate::cli::RuntimeConfig;
use crate::config::PublisherConfig;
use crate::error::{ConfigError, ReleaseError, Result};
use crate::github::ReleaseApi;
use crate::publish::ReleasePublisher;

/// Execute upload command
pub(super) async fn execute_upload<A: ReleaseApi>(
    publisher: &ReleasePublisher<A>,
    config: &PublisherConfig,
    runtime: &RuntimeConfig,
) -> Result<()> {
    let dir = config.require_artifacts_dir()?;
    let artifacts = collect_artifacts(dir)?;
    if artifacts.is_empty() {
        return Err(ReleaseError::Configuration(ConfigError::InvalidValue {
            setting: "artifacts dir".to_string(),
            value: dir.display().to_string(),
            reason: "no artifacts found".to_string(),
        }));
    }
    publisher.check_artifacts(&artifacts)?;

    runtime.section(&format!("Draft release {}", config.release_name()));
    runtime.println(&format!(
        "🔍 Reconciling draft ({:?} mode{})...",
        config.mode,
        if config.force { ", forced" } else { "" }
    ));
    let release = publisher.prepare_draft().await?;
    runtime.success_println(&format!(
        "Draft {} ready: {}",
        release.id,
        release.html_url.as_deref().unwrap_or("N/A")
    ));

    runtime.section(&format!("Uploading {} artifact(s)", artifacts.len()));
    let summary = publisher.upload_all(&release, &artifacts).await?;

    for asset in &summary.uploaded {
        runtime.indent(&format!("✓ Uploaded: {} ({} bytes)", asset.name, asset.size));
    }
    for name in &summary.skipped {
        runtime.indent(&format!("✓ Skipping {} (already uploaded)", name));
    }
    if !summary.skipped.is_empty() {
        runtime.warning_println("Re-run with --force to replace existing assets");
    }

    Ok(())
}
