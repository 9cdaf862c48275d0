//! viral_score tool implementation.
//!
//! Scores the viral potential of a single post.

use quill_client::analysis::variants::VIRAL_SCORE;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::analyze::analyze_impl;
use crate::handler::ServerState;

/// Input parameters for the viral_score tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ViralScoreParams {
    /// The post text to score (at least 20 characters).
    #[serde(default)]
    pub post: String,
}

pub async fn viral_score_impl(state: &ServerState, params: ViralScoreParams) -> Result<CallToolResult, McpError> {
    analyze_impl(state, &VIRAL_SCORE, vec![params.post]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::analyze::tests::{body, state};
    use quill_core::Locale;

    #[test]
    fn test_missing_field_deserializes_empty() {
        let params: ViralScoreParams = serde_json::from_str("{}").unwrap();
        assert!(params.post.is_empty());
    }

    #[tokio::test]
    async fn test_empty_post_warns_in_arabic() {
        let (state, _) = state(Ok("unused"), Locale::Ar).await;
        let result = viral_score_impl(&state, ViralScoreParams::default()).await.unwrap();
        let out = body(&result);
        assert_eq!(out["status"], "warning");
        assert!(out["message"].as_str().unwrap().contains("نص المنشور"));
    }
}
