//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_retries` exceeds 10
    /// - `retry_base_delay_ms` exceeds one minute
    /// - `gemini_base_url` is not an http(s) URL
    /// - `model`, `user_agent` or `output_language` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.max_retries > 10 {
            return Err(invalid("max_retries", "must not exceed 10"));
        }
        if self.retry_base_delay_ms > 60_000 {
            return Err(invalid("retry_base_delay_ms", "must not exceed 60000ms"));
        }

        if !(self.gemini_base_url.starts_with("https://") || self.gemini_base_url.starts_with("http://")) {
            return Err(invalid("gemini_base_url", "must start with http:// or https://"));
        }

        if self.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }
        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.output_language.trim().is_empty() {
            return Err(invalid("output_language", "must not be empty"));
        }

        if !self.analytics_enabled {
            tracing::info!("analytics disabled; visits and clicks will not be recorded");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(config: &AppConfig) -> Option<String> {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("timeout_ms"));

        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("timeout_ms"));
    }

    #[test]
    fn test_validate_retry_bounds() {
        let config = AppConfig { max_retries: 11, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("max_retries"));

        let config = AppConfig { retry_base_delay_ms: 60_001, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("retry_base_delay_ms"));
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let config = AppConfig { gemini_base_url: "ftp://example.com".into(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("gemini_base_url"));
    }

    #[test]
    fn test_validate_empty_strings() {
        let config = AppConfig { model: " ".into(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("model"));

        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("user_agent"));

        let config = AppConfig { output_language: String::new(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("output_language"));
    }

    #[test]
    fn test_validate_edge_values() {
        let config = AppConfig {
            timeout_ms: 100,
            max_retries: 0,
            retry_base_delay_ms: 0,
            analytics_enabled: false,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = AppConfig { timeout_ms: 300_000, max_retries: 10, retry_base_delay_ms: 60_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
