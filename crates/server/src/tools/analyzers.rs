//! list_analyzers tool implementation.
//!
//! The help panel: what each analysis tool does and what it needs.

use quill_client::analysis::variants::{self, OutputFormat, Variant};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::analyze::to_json;
use crate::error::ToolError;
use crate::handler::ServerState;

/// Parameters for the list_analyzers tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListAnalyzersParams {
    /// Only describe this tool. Describing a single tool counts as opening it.
    #[serde(default)]
    pub tool: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldInfo {
    pub name: String,
    pub label: String,
    pub min_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzerInfo {
    pub tool: String,
    pub scope_id: String,
    pub title: String,
    pub help: String,
    pub fields: Vec<FieldInfo>,
    /// `free_text` or `structured`.
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListAnalyzersOutput {
    pub analyzers: Vec<AnalyzerInfo>,
}

fn describe(variant: &Variant, state: &ServerState) -> AnalyzerInfo {
    AnalyzerInfo {
        tool: variant.tool.into(),
        scope_id: variant.scope_id.into(),
        title: variant.title.into(),
        help: variant.help.into(),
        fields: variant
            .fields
            .iter()
            .map(|f| FieldInfo { name: f.name.into(), label: f.label(state.locale).into(), min_chars: variant.min_chars })
            .collect(),
        output: match variant.output {
            OutputFormat::FreeText => "free_text".into(),
            OutputFormat::Structured { .. } => "structured".into(),
        },
    }
}

pub async fn list_impl(state: &ServerState, params: ListAnalyzersParams) -> Result<CallToolResult, McpError> {
    let analyzers = match params.tool.as_deref() {
        Some(tool) => {
            let variant = variants::by_tool(tool).ok_or_else(|| ToolError::UnknownTool(tool.to_string()))?;
            state.analyzer.open_variant(&state.session, variant).await;
            vec![describe(variant, state)]
        }
        None => variants::all().into_iter().map(|v| describe(v, state)).collect(),
    };

    let json = to_json(&ListAnalyzersOutput { analyzers })?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
