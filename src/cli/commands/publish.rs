//! Publish command: promote the draft release.

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::github::ReleaseApi;
use crate::publish::ReleasePublisher;

/// Execute publish command
pub(super) async fn execute_publish<A: ReleaseApi>(
    publisher: &ReleasePublisher<A>,
    runtime: &RuntimeConfig,
) -> Result<()> {
    let tag = publisher.tag();
    runtime.println(&format!("🚀 Publishing draft release {}...", tag));

    let release = publisher.publish(&tag).await?;

    runtime.success_println(&format!("Published release {}", release.id));
    runtime.indent(&format!(
        "Commit: {}",
        release.target_commitish.as_deref().unwrap_or("-")
    ));
    if let Some(url) = &release.html_url {
        runtime.indent(&format!("URL: {}", url));
    }
    Ok(())
}
