//! conversion_path tool implementation.
//!
//! Designs a three-step micro-conversion path (call to action, lead magnet,
//! follow-up) from a content topic and a final offer.

use quill_client::analysis::variants::CONVERSION_PATH;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::analyze::analyze_impl;
use crate::handler::ServerState;

/// Input parameters for the conversion_path tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConversionPathParams {
    /// The content topic (at least 15 characters).
    #[serde(default)]
    pub topic: String,

    /// The final offer the path leads to (at least 15 characters).
    #[serde(default)]
    pub offer: String,
}

pub async fn conversion_path_impl(
    state: &ServerState, params: ConversionPathParams,
) -> Result<CallToolResult, McpError> {
    analyze_impl(state, &CONVERSION_PATH, vec![params.topic, params.offer]).await
}
