//! Server-local errors.
//!
//! Domain failures use `quill_core::Error`; these cover the MCP surface only.

use rmcp::model::{ErrorCode, ErrorData as McpError};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A tool name with no analyzer behind it.
    #[error("UNKNOWN_TOOL: {0}")]
    UnknownTool(String),

    /// Tool output could not be encoded.
    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let code = match &err {
            ToolError::UnknownTool(_) => -32601,
            ToolError::Serialize(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_code() {
        let err: McpError = ToolError::UnknownTool("nope".into()).into();
        assert_eq!(err.code, ErrorCode(-32601));
        assert!(err.message.contains("nope"));
    }
}
