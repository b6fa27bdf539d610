//! Draft reconciliation

use super::{ReleasePublisher, execute_with_retry};
use crate::config::ReconcileMode;
use crate::error::{ReleaseError, Result};
use crate::github::{NewRelease, Release, ReleaseApi};

impl<A: ReleaseApi> ReleasePublisher<A> {
    /// Return the draft that artifacts for `tag` should be uploaded to.
    ///
    /// Strict mode rejects any existing release for the tag. Merge mode
    /// reuses a single existing draft, rejects a published release and
    /// refuses to pick between several drafts. When nothing matches, a new
    /// draft is created.
    pub async fn get_or_create_draft(&self, tag: &str) -> Result<Release> {
        let existing = self.find_releases_by_tag(tag, true).await?;

        match self.mode {
            ReconcileMode::Strict => {
                if !existing.is_empty() {
                    return Err(strict_conflict(tag, &existing));
                }
            }
            ReconcileMode::Merge => {
                if existing.iter().any(|release| !release.draft) {
                    return Err(ReleaseError::Conflict {
                        tag: tag.to_string(),
                        reason: "a release with this tag is already published".to_string(),
                    });
                }

                let mut drafts = existing;
                match drafts.len() {
                    0 => {}
                    1 => {
                        let draft = drafts.remove(0);
                        log::info!("Reusing draft release {} for {}", draft.id, tag);
                        return Ok(draft);
                    }
                    count => {
                        return Err(ReleaseError::Ambiguous {
                            tag: tag.to_string(),
                            count,
                        });
                    }
                }
            }
        }

        self.create_draft(tag).await
    }

    /// Draft for the configured tag, applying the forced-recovery policy.
    ///
    /// With `force` set, a strict-mode conflict is resolved by deleting every
    /// release holding the tag and creating a fresh draft.
    pub async fn prepare_draft(&self) -> Result<Release> {
        let tag = self.tag();

        match self.get_or_create_draft(&tag).await {
            Err(ReleaseError::Conflict { .. })
                if self.force && self.mode == ReconcileMode::Strict =>
            {
                log::warn!("Deleting existing release(s) for {} (--force)", tag);
                for release in self.find_releases_by_tag(&tag, true).await? {
                    self.remove_release(&release).await?;
                }
                self.create_draft(&tag).await
            }
            other => other,
        }
    }

    async fn create_draft(&self, tag: &str) -> Result<Release> {
        let payload = NewRelease {
            tag_name: tag.to_string(),
            name: self.channel.release_name(tag),
            body: self.release_body.clone(),
            draft: true,
            prerelease: false,
        };

        let api = &self.api;
        let payload = &payload;
        let policy = self.api_policy();
        let release = execute_with_retry(&policy, "Draft release creation", |_| async move {
            api.create_release(payload).await.map_err(ReleaseError::from)
        })
        .await?;

        log::info!("Created draft release {} for {}", release.id, tag);
        Ok(release)
    }
}

fn strict_conflict(tag: &str, existing: &[Release]) -> ReleaseError {
    let drafts = existing.iter().filter(|release| release.draft).count();
    let published = existing.len() - drafts;
    ReleaseError::Conflict {
        tag: tag.to_string(),
        reason: format!(
            "{} draft(s) and {} published release(s) already exist",
            drafts, published
        ),
    }
}
