//! Gemini API client error types.

use std::sync::Arc;

/// Errors from the Gemini generateContent client.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// No API key configured.
    #[error("missing API key: QUILL_GEMINI_API_KEY not set")]
    MissingApiKey,

    /// Base URL or model produced an unusable endpoint.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request rejected before sending.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited or quota exhausted.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// The model returned no text (e.g., blocked by safety filters).
    #[error("empty response: {0}")]
    EmptyResponse(String),
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { GeminiError::Timeout } else { GeminiError::Network(Arc::new(err)) }
    }
}

impl From<GeminiError> for quill_core::Error {
    fn from(err: GeminiError) -> Self {
        use quill_core::Error;

        match err {
            GeminiError::RateLimited => Error::Quota(err.to_string()),
            GeminiError::Parse(_) | GeminiError::EmptyResponse(_) => Error::Parse(err.to_string()),
            GeminiError::MissingApiKey | GeminiError::InvalidEndpoint(_) | GeminiError::InvalidRequest(_) => {
                Error::Internal(err.to_string())
            }
            GeminiError::AuthError | GeminiError::HttpError { .. } | GeminiError::Timeout | GeminiError::Network(_) => {
                Error::Transport(err.to_string())
            }
        }
    }
}
