//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (QUILL_*)
//! 2. TOML config file (if QUILL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Language of user-facing messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ar,
    En,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (QUILL_*)
/// 2. TOML config file (if QUILL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini API key.
    ///
    /// Set via QUILL_GEMINI_API_KEY environment variable.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Base URL of the Gemini REST API.
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Model used for every analysis.
    ///
    /// Set via QUILL_MODEL environment variable.
    #[serde(default = "default_model")]
    pub model: String,

    /// Path to SQLite cache database.
    ///
    /// Set via QUILL_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via QUILL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Extra attempts after a rate-limit response.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First rate-limit backoff delay; doubles on every further attempt.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Language of warnings and error messages shown to the user.
    #[serde(default)]
    pub locale: Locale,

    /// Language the model is asked to answer in.
    #[serde(default = "default_output_language")]
    pub output_language: String,

    /// Whether visits and clicks are recorded.
    #[serde(default = "default_true")]
    pub analytics_enabled: bool,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./quill-cache.sqlite")
}

fn default_user_agent() -> String {
    "quill/0.1".into()
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1_000
}

fn default_output_language() -> String {
    "Arabic".into()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_base_url: default_gemini_base_url(),
            model: default_model(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            locale: Locale::default(),
            output_language: default_output_language(),
            analytics_enabled: true,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `QUILL_`
    /// 2. TOML file from `QUILL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or parsed, or if
    /// validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("QUILL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("QUILL_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// The Gemini API key, which the server needs before it can start.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is unset or blank.
    pub fn require_gemini_api_key(&self) -> Result<&str, ConfigError> {
        self.gemini_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "gemini_api_key".into(),
                hint: "Set QUILL_GEMINI_API_KEY environment variable".into(),
            })
    }
}
