//! Gemini generateContent API client.
//!
//! ### Behavior
//!
//! - **Endpoint**: `{base_url}/models/{model}:generateContent`
//! - **Authentication**: `x-goog-api-key` header.
//! - **Rate Limiting**: on HTTP 429 only, retries up to `max_retries` times,
//!   sleeping `retry_base_delay * 2^attempt` (capped at 30s) between attempts.
//!   Every other failure is returned immediately.
//! - **Normalization**: returns the concatenated text of the first candidate.

pub mod error;
pub mod request;
pub mod response;

pub use error::GeminiError;
pub use request::{GenerateRequest, SamplingConfig};
pub use response::GenerateContentResponse;

use async_trait::async_trait;
use quill_core::AppConfig;
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Default base URL for the Gemini REST API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "quill/0.1";

/// Upper bound for a single backoff sleep.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// The remote text-generation service, as seen by the analysis pipeline.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one generation and return its text.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GeminiError>;
}

/// Gemini API client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Base URL (default: https://generativelanguage.googleapis.com/v1beta).
    pub base_url: String,
    pub model: String,
    /// Request timeout (default: 60s).
    pub timeout: Duration,
    pub user_agent: String,
    /// Extra attempts after a 429 response.
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
        }
    }
}

impl GeminiConfig {
    /// Derive client settings from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GeminiError> {
        let api_key = config
            .require_gemini_api_key()
            .map_err(|_| GeminiError::MissingApiKey)?
            .to_string();

        Ok(Self {
            api_key,
            base_url: config.gemini_base_url.clone(),
            model: config.model.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay(),
        })
    }

    fn endpoint(&self) -> Result<Url, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model);
        Url::parse(&url).map_err(|e| GeminiError::InvalidEndpoint(format!("{url}: {e}")))
    }
}

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: Arc<GeminiConfig>,
    endpoint: Url,
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        if config.api_key.is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let endpoint = config.endpoint()?;

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| GeminiError::Network(Arc::new(e)))?;

        Ok(Self { http, config: Arc::new(config), endpoint })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Delay before retry number `attempt + 1`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(16);
        self.config.retry_base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }

    /// Send one request without retrying.
    async fn generate_once(&self, req: &GenerateRequest) -> Result<String, GeminiError> {
        let start = Instant::now();

        let http_response = self
            .http
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&req.body())
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(%status, model = %self.config.model, "Gemini API response");

        if status == 401 || status == 403 {
            return Err(GeminiError::AuthError);
        }

        if status == 429 {
            return Err(GeminiError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(GeminiError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let response: GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|e| GeminiError::Parse(e.to_string()))?;

        let text = response.text().ok_or_else(|| GeminiError::EmptyResponse(response.empty_reason()))?;

        tracing::debug!(elapsed = ?start.elapsed(), chars = text.chars().count(), "generation completed");

        Ok(text)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GeminiError> {
        request.validate()?;

        let mut attempt = 0;
        loop {
            match self.generate_once(request).await {
                Err(GeminiError::RateLimited) if attempt < self.config.max_retries => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(attempt = attempt + 1, delay_ms = delay.as_millis() as u64, "rate limited, backing off");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "/models/test-model:generateContent";

    fn config(base_url: &str, max_retries: u32) -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".into(),
            base_url: base_url.into(),
            model: "test-model".into(),
            timeout: Duration::from_secs(5),
            max_retries,
            retry_base_delay: Duration::from_millis(1),
            ..Default::default()
        }
    }

    fn request() -> GenerateRequest {
        GenerateRequest {
            system_instruction: "You are an analyst.".into(),
            prompt: "Analyze this post.".into(),
            sampling: SamplingConfig::minimal_variance(),
            response_schema: None,
        }
    }

    const OK_BODY: &str = r#"{"candidates":[{"content":{"parts":[{"text":"Score: 80/100\nGood."}]},"finishReason":"STOP"}]}"#;

    #[test]
    fn test_client_new_missing_key() {
        let result = GeminiClient::new(GeminiConfig::default());
        assert!(matches!(result, Err(GeminiError::MissingApiKey)));
    }

    #[test]
    fn test_from_app_config() {
        let app = AppConfig { gemini_api_key: Some("k".into()), model: "m".into(), ..Default::default() };
        let config = GeminiConfig::from_app_config(&app).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.model, "m");
        assert_eq!(config.max_retries, 3);

        let app = AppConfig::default();
        assert!(matches!(GeminiConfig::from_app_config(&app), Err(GeminiError::MissingApiKey)));
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(config("https://example.com/v1beta/", 0)).unwrap();
        assert_eq!(client.endpoint.as_str(), "https://example.com/v1beta/models/test-model:generateContent");
        assert_eq!(client.model(), "test-model");
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: "k".into(),
            retry_base_delay: Duration::from_millis(500),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.backoff(0), Duration::from_millis(500));
        assert_eq!(client.backoff(1), Duration::from_millis(1000));
        assert_eq!(client.backoff(2), Duration::from_millis(2000));
        assert_eq!(client.backoff(10), MAX_BACKOFF);
        assert_eq!(client.backoff(40), MAX_BACKOFF);
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"contents":[{"role":"user","parts":[{"text":"Analyze this post."}]}]}"#.into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(OK_BODY)
            .create_async()
            .await;

        let client = GeminiClient::new(config(&server.url(), 0)).unwrap();
        let text = client.generate(&request()).await.unwrap();

        assert_eq!(text, "Score: 80/100\nGood.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_retries_then_gives_up() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", PATH).with_status(429).expect(3).create_async().await;

        let client = GeminiClient::new(config(&server.url(), 2)).unwrap();
        let result = client.generate(&request()).await;

        assert!(matches!(result, Err(GeminiError::RateLimited)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", PATH).with_status(500).expect(1).create_async().await;

        let client = GeminiClient::new(config(&server.url(), 3)).unwrap();
        let result = client.generate(&request()).await;

        assert!(matches!(result, Err(GeminiError::HttpError { status: 500 })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_auth_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", PATH).with_status(403).create_async().await;

        let client = GeminiClient::new(config(&server.url(), 0)).unwrap();
        assert!(matches!(client.generate(&request()).await, Err(GeminiError::AuthError)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", PATH).with_status(200).with_body("not json").create_async().await;

        let client = GeminiClient::new(config(&server.url(), 0)).unwrap();
        assert!(matches!(client.generate(&request()).await, Err(GeminiError::Parse(_))));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(config(&server.url(), 0)).unwrap();
        let result = client.generate(&request()).await;
        assert!(matches!(result, Err(GeminiError::EmptyResponse(reason)) if reason.contains("SAFETY")));
    }

    #[tokio::test]
    async fn test_invalid_request_never_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", PATH).expect(0).create_async().await;

        let client = GeminiClient::new(config(&server.url(), 0)).unwrap();
        let mut req = request();
        req.prompt = String::new();

        assert!(matches!(client.generate(&req).await, Err(GeminiError::InvalidRequest(_))));
        mock.assert_async().await;
    }
}
