//! Error types for release publishing operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release publishing operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release publishing operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Missing or invalid required setting
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A release already exists in a state incompatible with the operation
    #[error("Release conflict for tag '{tag}': {reason}")]
    Conflict {
        /// Tag the conflict was detected on
        tag: String,
        /// What was found
        reason: String,
    },

    /// More than one draft matches a tag
    #[error("Ambiguous release state for tag '{tag}': found {count} drafts, expected at most one")]
    Ambiguous {
        /// Tag with multiple drafts
        tag: String,
        /// Number of matching drafts
        count: usize,
    },

    /// Expected remote entity is missing
    #[error("Not found: {what}")]
    NotFound {
        /// Description of the missing entity
        what: String,
    },

    /// Malformed version string
    #[error("Invalid version '{version}': {reason}")]
    Invalid {
        /// Version string
        version: String,
        /// Reason for the error
        reason: String,
    },

    /// Release API errors
    #[error("GitHub error: {0}")]
    Api(#[from] ApiError),

    /// Local artifact read failures
    #[error("Failed to read artifact {path}: {source}")]
    Artifact {
        /// Artifact path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the release API client
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection-level failure, timeout or server-side error (retryable)
    #[error("Network error during {operation}: {reason}")]
    Transient {
        /// API operation that failed
        operation: String,
        /// Reason for the error
        reason: String,
    },

    /// Remote entity does not exist
    #[error("{operation} returned 404 Not Found")]
    NotFound {
        /// API operation that failed
        operation: String,
    },

    /// Non-success response the caller must handle
    #[error("{operation} failed with HTTP {status}: {message}")]
    Rejected {
        /// API operation that failed
        operation: String,
        /// HTTP status code
        status: u16,
        /// Message returned by the API
        message: String,
    },

    /// Request could not be built
    #[error("Invalid {operation} request: {reason}")]
    InvalidRequest {
        /// API operation that failed
        operation: String,
        /// Reason for the error
        reason: String,
    },

    /// Response body could not be decoded
    #[error("Failed to decode {operation} response: {reason}")]
    Decode {
        /// API operation that failed
        operation: String,
        /// Reason for the error
        reason: String,
    },
}

/// Configuration errors, raised once at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required setting absent
    #[error("Missing required setting: {setting}. {hint}")]
    Missing {
        /// Setting name
        setting: String,
        /// How to provide it
        hint: String,
    },

    /// Setting present but unusable
    #[error("Invalid value '{value}' for {setting}: {reason}")]
    InvalidValue {
        /// Setting name
        setting: String,
        /// Provided value
        value: String,
        /// Reason for the error
        reason: String,
    },
}

impl ApiError {
    /// Whether the failure is a network-class error worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transient { .. })
    }
}

impl ReleaseError {
    /// Whether this error belongs to the retryable network class
    pub fn is_transient(&self) -> bool {
        matches!(self, ReleaseError::Api(api) if api.is_transient())
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Configuration(ConfigError::Missing { setting, .. })
                if setting == "token" =>
            {
                vec![
                    "Export a token with repo scope: export GH_TOKEN=<token>".to_string(),
                    "Or pass it explicitly with --token".to_string(),
                ]
            }
            ReleaseError::Configuration(_) => {
                vec!["Run with --help to see the accepted settings".to_string()]
            }
            ReleaseError::Conflict { tag, .. } => vec![
                format!("Inspect the existing release for '{}' on GitHub", tag),
                "Delete it with the delete command using the same --version-string and --channel"
                    .to_string(),
                "Or re-run upload with --mode strict --force to delete and recreate the draft"
                    .to_string(),
            ],
            ReleaseError::Ambiguous { tag, .. } => vec![
                format!("Delete the duplicate drafts for '{}' manually on GitHub", tag),
                "Re-run once a single draft remains".to_string(),
            ],
            ReleaseError::NotFound { .. } => vec![
                "Run the upload command first to create the draft release".to_string(),
            ],
            ReleaseError::Invalid { .. } => vec![
                "Use a MAJOR.MINOR.PATCH version, e.g. 1.2.3".to_string(),
            ],
            ReleaseError::Api(ApiError::Transient { .. }) => vec![
                "Check network connectivity to the GitHub API".to_string(),
                "Re-run the command; uploads are idempotent".to_string(),
            ],
            ReleaseError::Api(ApiError::Rejected { status: 401, .. })
            | ReleaseError::Api(ApiError::Rejected { status: 403, .. }) => vec![
                "Verify the token is valid and has write access to the repository".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
