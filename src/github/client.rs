//! GitHub REST client for the releases API

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::{Asset, NewRelease, Release, ReleaseApi, ReleasePatch};
use crate::config::PublisherConfig;
use crate::error::{ApiError, Result};

/// Page size for list endpoints (GitHub maximum)
const PER_PAGE: usize = 100;

/// Per-request timeout; uploads of large installers need headroom
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

const GITHUB_API_VERSION: &str = "2022-11-28";

/// One-time initialization guard for rustls crypto provider
static RUSTLS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// GitHub releases client bound to one repository
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    /// `<api>/repos/<owner>/<repo>/`
    repo_url: Url,
    /// `<uploads>/repos/<owner>/<repo>/`
    uploads_url: Url,
}

impl GitHubClient {
    /// Create a client for the configured repository
    pub fn new(config: &PublisherConfig) -> Result<Self> {
        RUSTLS_INITIALIZED.get_or_init(|| {
            // Fails only when a provider is already installed, which is fine.
            let _ = rustls::crypto::ring::default_provider().install_default();
        });

        let repo_path = format!("repos/{}/{}/", config.owner, config.repo);
        let repo_url = join(&config.api_url, &repo_path, "client_init")?;
        let uploads_url = join(&config.uploads_url, &repo_path, "client_init")?;

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::InvalidRequest {
                operation: "client_init".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            token: config.token.clone(),
            repo_url,
            uploads_url,
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    fn endpoint(&self, path: &str, operation: &str) -> std::result::Result<Url, ApiError> {
        join(&self.repo_url, path, operation)
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        operation: &str,
    ) -> std::result::Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| classify_transport_error(operation, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(operation, status, &body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: &str,
    ) -> std::result::Result<T, ApiError> {
        let response = self.send(builder, operation).await?;
        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                ApiError::Decode {
                    operation: operation.to_string(),
                    reason: e.to_string(),
                }
            } else {
                classify_transport_error(operation, e)
            }
        })
    }

    async fn list_paginated<T: DeserializeOwned>(
        &self,
        url: Url,
        operation: &str,
    ) -> std::result::Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            let builder = self
                .request(Method::GET, url.clone())
                .query(&[("per_page", PER_PAGE), ("page", page)]);
            let batch: Vec<T> = self.send_json(builder, operation).await?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                break;
            }
            page += 1;
        }

        log::debug!("{} returned {} item(s) over {} page(s)", operation, items.len(), page);
        Ok(items)
    }
}

#[async_trait]
impl ReleaseApi for GitHubClient {
    async fn list_releases(&self) -> std::result::Result<Vec<Release>, ApiError> {
        let url = self.endpoint("releases", "list_releases")?;
        self.list_paginated(url, "list_releases").await
    }

    async fn create_release(
        &self,
        release: &NewRelease,
    ) -> std::result::Result<Release, ApiError> {
        log::debug!("Creating release {}", release.tag_name);
        let url = self.endpoint("releases", "create_release")?;
        let builder = self.request(Method::POST, url).json(release);
        self.send_json(builder, "create_release").await
    }

    async fn patch_release(
        &self,
        release_id: u64,
        patch: &ReleasePatch,
    ) -> std::result::Result<Release, ApiError> {
        log::debug!("Updating release {}: {:?}", release_id, patch);
        let url = self.endpoint(&format!("releases/{}", release_id), "patch_release")?;
        let builder = self.request(Method::PATCH, url).json(patch);
        self.send_json(builder, "patch_release").await
    }

    async fn delete_release(&self, release_id: u64) -> std::result::Result<(), ApiError> {
        log::debug!("Deleting release {}", release_id);
        let url = self.endpoint(&format!("releases/{}", release_id), "delete_release")?;
        self.send(self.request(Method::DELETE, url), "delete_release")
            .await
            .map(|_| ())
    }

    async fn list_assets(&self, release_id: u64) -> std::result::Result<Vec<Asset>, ApiError> {
        let url = self.endpoint(&format!("releases/{}/assets", release_id), "list_assets")?;
        self.list_paginated(url, "list_assets").await
    }

    async fn upload_asset(
        &self,
        release_id: u64,
        name: &str,
        content_type: &str,
        content: Bytes,
    ) -> std::result::Result<Asset, ApiError> {
        log::debug!(
            "Uploading {} ({} bytes) to release {}",
            name,
            content.len(),
            release_id
        );
        let url = join(
            &self.uploads_url,
            &format!("releases/{}/assets", release_id),
            "upload_asset",
        )?;
        let builder = self
            .request(Method::POST, url)
            .query(&[("name", name)])
            .header(CONTENT_TYPE, content_type)
            .body(content);
        self.send_json(builder, "upload_asset").await
    }

    async fn delete_asset(&self, asset_id: u64) -> std::result::Result<(), ApiError> {
        log::debug!("Deleting asset {}", asset_id);
        let url = self.endpoint(&format!("releases/assets/{}", asset_id), "delete_asset")?;
        self.send(self.request(Method::DELETE, url), "delete_asset")
            .await
            .map(|_| ())
    }
}

fn join(base: &Url, path: &str, operation: &str) -> std::result::Result<Url, ApiError> {
    base.join(path).map_err(|e| ApiError::InvalidRequest {
        operation: operation.to_string(),
        reason: format!("cannot join '{}' onto {}: {}", path, base, e),
    })
}

/// Map a transport-level reqwest failure to the API error taxonomy
fn classify_transport_error(operation: &str, error: reqwest::Error) -> ApiError {
    if error.is_builder() {
        return ApiError::InvalidRequest {
            operation: operation.to_string(),
            reason: error.to_string(),
        };
    }

    ApiError::Transient {
        operation: operation.to_string(),
        reason: error.to_string(),
    }
}

/// Map a non-success HTTP status to the API error taxonomy.
///
/// 5xx and 429 are treated as transient; 404 is NotFound; everything else
/// is a semantic rejection.
fn classify_status(operation: &str, status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound {
            operation: operation.to_string(),
        }
    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        ApiError::Transient {
            operation: operation.to_string(),
            reason: format!("HTTP {}: {}", status.as_u16(), message),
        }
    } else {
        ApiError::Rejected {
            operation: operation.to_string(),
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RawSettings, RetryConfig};

    fn config(api_url: &str) -> PublisherConfig {
        PublisherConfig::from_settings(
            RawSettings {
                token: Some("ghp_test".to_string()),
                repo: Some("cyrup-ai/desktop".to_string()),
                version: Some("1.0.0".to_string()),
                channel: Some("dev".to_string()),
                api_url: Some(api_url.to_string()),
                ..RawSettings::default()
            },
            RetryConfig::immediate(),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoints_are_scoped_to_repository() {
        let client = GitHubClient::new(&config("https://ghe.example.com/api/v3")).unwrap();
        let url = client.endpoint("releases/12/assets", "list_assets").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/cyrup-ai/desktop/releases/12/assets"
        );
        assert_eq!(
            client.uploads_url.as_str(),
            "https://uploads.github.com/repos/cyrup-ai/desktop/"
        );
    }

    #[test]
    fn test_status_classification() {
        assert!(classify_status("x", StatusCode::BAD_GATEWAY, "").is_transient());
        assert!(classify_status("x", StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(matches!(
            classify_status("x", StatusCode::NOT_FOUND, ""),
            ApiError::NotFound { .. }
        ));

        match classify_status(
            "create_release",
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"Validation Failed"}"#,
        ) {
            ApiError::Rejected { status, message, .. } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Validation Failed");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_transient() {
        // Nothing listens on port 9 of the loopback interface.
        let client = GitHubClient::new(&config("http://127.0.0.1:9/")).unwrap();
        let err = client.list_releases().await.unwrap_err();
        assert!(err.is_transient(), "expected transient, got {err:?}");
    }
}
