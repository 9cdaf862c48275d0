//! missing_topics tool implementation.
//!
//! Content gap analysis between the user's posts and a competitor's posts.

use quill_client::analysis::variants::MISSING_TOPICS;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::analyze::analyze_impl;
use crate::handler::ServerState;

/// Input parameters for the missing_topics tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MissingTopicsParams {
    /// Titles or summaries of your recent posts, one per line.
    #[serde(default)]
    pub my_posts: String,

    /// Titles or summaries of a competitor's recent posts, one per line.
    #[serde(default)]
    pub competitor_posts: String,
}

pub async fn missing_topics_impl(state: &ServerState, params: MissingTopicsParams) -> Result<CallToolResult, McpError> {
    analyze_impl(state, &MISSING_TOPICS, vec![params.my_posts, params.competitor_posts]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::analyze::tests::{body, state};
    use quill_core::Locale;

    const MINE: &str = "1. Five Instagram mistakes\n2. Growing on TikTok in 30 days\n3. My first digital launch";
    const THEIRS: &str = "1. Picking a profitable course idea\n2. A monthly content plan\n3. Sales page mistakes";

    #[tokio::test]
    async fn test_renders_gap_table() {
        let reply = r#"{"missing_topics":[{"topic_title":"Pricing your course","gap_reason":"Neither side covers it","format_suggestion":"Live session"}],"summary_analysis":"Pricing is the open gap."}"#;
        let (state, _) = state(Ok(reply), Locale::En).await;
        let params = MissingTopicsParams { my_posts: MINE.into(), competitor_posts: THEIRS.into() };

        let out = body(&missing_topics_impl(&state, params).await.unwrap());

        let markdown = out["markdown"].as_str().unwrap();
        assert!(markdown.starts_with("# Missing Topic Generator"));
        assert!(markdown.contains("Pricing is the open gap."));
        assert!(markdown.contains("| Pricing your course | Neither side covers it | Live session |"));
    }

    #[tokio::test]
    async fn test_prose_reply_is_parse_error() {
        let (state, _) = state(Ok("Sure! Here are a few ideas."), Locale::En).await;
        let params = MissingTopicsParams { my_posts: MINE.into(), competitor_posts: THEIRS.into() };

        let result = missing_topics_impl(&state, params).await.unwrap();

        assert!(result.is_error.unwrap_or(false));
        let out = body(&result);
        assert!(!out["message"].as_str().unwrap().contains("Here are a few ideas"));
    }
}
