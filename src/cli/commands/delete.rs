//! Delete command: remove the release for the tag.

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::github::ReleaseApi;
use crate::publish::ReleasePublisher;

/// Execute delete command
pub(super) async fn execute_delete<A: ReleaseApi>(
    publisher: &ReleasePublisher<A>,
    runtime: &RuntimeConfig,
) -> Result<()> {
    let tag = publisher.tag();
    runtime.warning_println(&format!("Deleting release {}", tag));

    let release = publisher.delete_release(&tag).await?;

    runtime.success_println(&format!(
        "Deleted {} release {} ({} asset(s))",
        if release.draft { "draft" } else { "published" },
        release.id,
        release.assets.len()
    ));
    Ok(())
}
