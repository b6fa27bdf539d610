//! Retry configuration for network operations.
//!
//! Provides configurable retry limits for the release API and asset uploads,
//! allowing users to tune retry behavior based on network conditions.

use std::time::Duration;

use crate::error::ConfigError;

/// Default retry bound for both operation classes
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Upper bound accepted from the environment
const MAX_RETRIES_CEILING: u32 = 10;

/// Default base delay for exponential backoff
const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Configuration for retry behavior across different operation types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Max retries for release API calls (create release, delete release)
    pub release_api: u32,

    /// Max retries for file upload operations
    pub file_uploads: u32,

    /// Base delay between attempts; doubled on every retry
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            release_api: DEFAULT_MAX_RETRIES,
            file_uploads: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryConfig {
    /// Configuration without backoff sleeps
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Parse retry count from environment variable with clamping to maximum
    ///
    /// Returns the default when the variable is unset or not a number.
    fn parse_retry_env(var_name: &str, default: u32, max: u32) -> u32 {
        std::env::var(var_name)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .map(|v| v.min(max))
            .unwrap_or(default)
    }

    /// Create config from environment variables with fallback to defaults
    pub fn from_env() -> Self {
        let base_delay_ms = std::env::var("RELEASE_RETRY_DELAY_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_BASE_DELAY_MS);

        Self {
            release_api: Self::parse_retry_env(
                "RELEASE_RETRY_API",
                DEFAULT_MAX_RETRIES,
                MAX_RETRIES_CEILING,
            ),
            file_uploads: Self::parse_retry_env(
                "RELEASE_RETRY_UPLOADS",
                DEFAULT_MAX_RETRIES,
                MAX_RETRIES_CEILING,
            ),
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    /// Validate retry counts are reasonable
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (setting, value) in [
            ("release_api retries", self.release_api),
            ("file_uploads retries", self.file_uploads),
        ] {
            if value > MAX_RETRIES_CEILING {
                return Err(ConfigError::InvalidValue {
                    setting: setting.to_string(),
                    value: value.to_string(),
                    reason: format!("maximum is {}", MAX_RETRIES_CEILING),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_allow_three_retries() {
        let config = RetryConfig::default();
        assert_eq!(config.file_uploads, 3);
        assert_eq!(config.release_api, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_excessive_retries() {
        let config = RetryConfig {
            file_uploads: 50,
            ..RetryConfig::immediate()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unset_variable_falls_back_to_default() {
        let value = RetryConfig::parse_retry_env("RELEASE_RETRY_TEST_UNSET_VARIABLE", 3, 10);
        assert_eq!(value, 3);
    }
}
