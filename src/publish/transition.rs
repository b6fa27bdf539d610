//! Draft promotion and release deletion

use super::{ReleasePublisher, execute_with_retry};
use crate::error::{ApiError, ReleaseError, Result};
use crate::github::{Release, ReleaseApi, ReleasePatch};

impl<A: ReleaseApi> ReleasePublisher<A> {
    /// Promote the single draft tagged `tag` to a published prerelease.
    ///
    /// The commit tag is derived before any remote call so that an invalid
    /// version never mutates the release. The update is a single request and
    /// is not retried.
    pub async fn publish(&self, tag: &str) -> Result<Release> {
        let commit_tag = self.version.commit_tag()?;

        let mut matches = self.find_releases_by_tag(tag, true).await?;
        let draft = match matches.len() {
            0 => {
                return Err(ReleaseError::NotFound {
                    what: format!(
                        "no draft release tagged '{}'; run the upload command first",
                        tag
                    ),
                });
            }
            1 => matches.remove(0),
            count => {
                return Err(ReleaseError::Conflict {
                    tag: tag.to_string(),
                    reason: format!("{} releases carry this tag, expected one draft", count),
                });
            }
        };

        if !draft.draft {
            return Err(ReleaseError::Conflict {
                tag: tag.to_string(),
                reason: format!("release {} is already published", draft.id),
            });
        }

        let patch = ReleasePatch {
            draft: Some(false),
            prerelease: Some(true),
            tag_name: Some(tag.to_string()),
            target_commitish: Some(commit_tag),
        };

        let published = self.api.patch_release(draft.id, &patch).await?;
        log::info!(
            "Published release {} ({}) at {}",
            published.id,
            tag,
            published.target_commitish.as_deref().unwrap_or("-")
        );
        Ok(published)
    }

    /// Delete the first release (draft or published) tagged `tag`.
    ///
    /// Recovery path for strict-mode conflicts. Returns the deleted release.
    pub async fn delete_release(&self, tag: &str) -> Result<Release> {
        let release = self
            .find_releases_by_tag(tag, true)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ReleaseError::NotFound {
                what: format!("no release tagged '{}' to delete", tag),
            })?;

        self.remove_release(&release).await?;
        Ok(release)
    }

    pub(super) async fn remove_release(&self, release: &Release) -> Result<()> {
        let api = &self.api;
        let release_id = release.id;
        let policy = self.api_policy();

        // A 404 after a failed attempt means that attempt went through.
        execute_with_retry(&policy, "Release deletion", |attempt| async move {
            match api.delete_release(release_id).await {
                Err(ApiError::NotFound { .. }) if attempt > 0 => Ok(()),
                other => other.map_err(ReleaseError::from),
            }
        })
        .await?;

        log::info!("Deleted release {} ({})", release.id, release.tag_name);
        Ok(())
    }
}
