//! Release and asset records exchanged with the releases API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remote release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release ID
    pub id: u64,
    /// Tag the release is attached to
    pub tag_name: String,
    /// Whether the release is still a draft
    pub draft: bool,
    /// Whether the release is marked as a prerelease
    pub prerelease: bool,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Release notes
    #[serde(default)]
    pub body: Option<String>,
    /// Commit-ish the tag points at
    #[serde(default)]
    pub target_commitish: Option<String>,
    /// Release URL
    #[serde(default)]
    pub html_url: Option<String>,
    /// Publication time, unset for drafts
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Uploaded assets, in API order
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// Remote asset attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset ID
    pub id: u64,
    /// File name, unique within a release
    pub name: String,
    /// MIME type recorded at upload
    pub content_type: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Public download URL
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

/// Payload for creating a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
    /// Tag name
    pub tag_name: String,
    /// Display name
    pub name: String,
    /// Release notes
    pub body: String,
    /// Create as draft
    pub draft: bool,
    /// Mark as prerelease
    pub prerelease: bool,
}

/// Partial update of a release; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleasePatch {
    /// New draft flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    /// New prerelease flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,
    /// New tag name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// New commit-ish
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_decodes_api_payload() {
        let json = r#"{
            "id": 42,
            "tag_name": "v1.0.0dev",
            "draft": true,
            "prerelease": false,
            "name": "Release Channel v1.0.0dev",
            "body": null,
            "published_at": null,
            "html_url": "https://github.com/o/r/releases/tag/untagged-1",
            "author": {"login": "ci"},
            "assets": [
                {"id": 7, "name": "app.zip", "content_type": "application/octet-stream", "size": 12}
            ]
        }"#;

        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.id, 42);
        assert!(release.draft);
        assert_eq!(release.body, None);
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "app.zip");
        assert_eq!(release.assets[0].id, 7);
    }

    #[test]
    fn test_patch_omits_unset_fields() {
        let patch = ReleasePatch {
            draft: Some(false),
            ..ReleasePatch::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"draft":false}"#);
    }
}
