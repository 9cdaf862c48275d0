//! Unified error types for quill.
//!
//! Every failure that can cross a component boundary is one of these variants,
//! and every variant belongs to exactly one [`ErrorKind`].

use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde::Serialize;
use tokio_rusqlite::rusqlite;

/// Coarse classification of a failure, used to pick the user-facing message
/// and to decide whether a failure is reportable at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected locally; no network call was made.
    Validation,
    /// Network failure or non-success status from the remote service.
    Transport,
    /// The remote service reported a quota or rate limit.
    Quota,
    /// The remote response did not have the expected shape.
    Parse,
    /// A cache or analytics write/read failed.
    Persistence,
    /// Misconfiguration or a local serialization fault.
    Internal,
}

/// Unified error types for the quill server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required field was empty after normalization.
    #[error("EMPTY_INPUT: {field}")]
    EmptyInput { field: String },

    /// A field was shorter than the variant's minimum.
    #[error("INPUT_TOO_SHORT: {field} has {actual} chars (min {min})")]
    InputTooShort { field: String, min: usize, actual: usize },

    /// Invalid input parameters (e.g., wrong number of fields).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Transport-level failure talking to the generation service.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// Generation service rate limited or out of quota.
    #[error("QUOTA_EXCEEDED: {0}")]
    Quota(String),

    /// Generation output could not be parsed into the requested shape.
    #[error("PARSE_FAILED: {0}")]
    Parse(String),

    /// No cache entry found for the given key.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid hash format.
    #[error("CACHE_ERROR: invalid hash format")]
    InvalidHash,

    /// Configuration or serialization fault.
    #[error("INTERNAL_ERROR: {0}")]
    Internal(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyInput { .. } | Error::InputTooShort { .. } | Error::InvalidInput(_) => ErrorKind::Validation,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Quota(_) => ErrorKind::Quota,
            Error::Parse(_) => ErrorKind::Parse,
            Error::CacheMiss(_) | Error::Database(_) | Error::MigrationFailed(_) | Error::InvalidHash => {
                ErrorKind::Persistence
            }
            Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether this error is a local input rejection.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::EmptyInput { .. } | Error::InputTooShort { .. } | Error::InvalidInput(_) => -32602,
            Error::Transport(_) => -32000,
            Error::CacheMiss(_) => -32001,
            Error::Database(_) | Error::MigrationFailed(_) | Error::InvalidHash => -32002,
            Error::Quota(_) => -32003,
            Error::Parse(_) => -32004,
            Error::Internal(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CacheMiss("abc123".to_string());
        assert!(err.to_string().contains("CACHE_MISS"));
        assert!(err.to_string().contains("abc123"));

        let err = Error::InputTooShort { field: "post".into(), min: 20, actual: 4 };
        assert_eq!(err.to_string(), "INPUT_TOO_SHORT: post has 4 chars (min 20)");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::EmptyInput { field: "topic".into() }.kind(), ErrorKind::Validation);
        assert_eq!(Error::Transport("reset".into()).kind(), ErrorKind::Transport);
        assert_eq!(Error::Quota("429".into()).kind(), ErrorKind::Quota);
        assert_eq!(Error::Parse("eof".into()).kind(), ErrorKind::Parse);
        assert_eq!(Error::InvalidHash.kind(), ErrorKind::Persistence);
        assert_eq!(Error::Internal("boom".into()).kind(), ErrorKind::Internal);
        assert!(Error::InvalidInput("x".into()).is_validation());
        assert!(!Error::Parse("x".into()).is_validation());
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::CacheMiss("abc123".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);

        let mcp_err: McpError = Error::Quota("slow down".into()).into();
        assert_eq!(mcp_err.code.0, -32003);
        assert!(mcp_err.message.contains("QUOTA_EXCEEDED"));
    }
}
