//! cache_lookup tool implementation.
//!
//! Reads one stored analysis by its composite key. Read-only.

use quill_client::analysis::{extract, render_markdown, variants};
use quill_core::{CacheEntry, Error, fingerprint::is_valid_fingerprint};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::handler::ServerState;
use crate::tools::analyze::to_json;

/// Parameters for the cache_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheLookupParams {
    /// Tool whose cache to read, e.g. `viral_score`.
    pub tool: String,
    /// Content hash returned by an earlier analysis.
    pub content_hash: String,
}

/// Output from the cache_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheLookupOutput {
    pub entry: CacheEntry,
    /// Rendered results area, when the stored text is still readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

pub async fn lookup_impl(state: &ServerState, params: CacheLookupParams) -> Result<CallToolResult, McpError> {
    let variant = variants::by_tool(&params.tool).ok_or_else(|| ToolError::UnknownTool(params.tool.clone()))?;
    if !is_valid_fingerprint(&params.content_hash) {
        return Err(Error::InvalidHash.into());
    }

    let entry = state
        .db
        .get_entry(variant.scope_id, &params.content_hash)
        .await?
        .ok_or_else(|| Error::CacheMiss(format!("{}/{}", variant.scope_id, params.content_hash)))?;

    let markdown = extract(&variant.output, &entry.analysis_text)
        .map(|analysis| render_markdown(variant, &analysis, true, state.locale))
        .ok();

    let json = to_json(&CacheLookupOutput { entry, markdown })?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::analyze::tests::{body, state};
    use quill_core::{AnalysisRequest, Locale};

    #[tokio::test]
    async fn test_lookup_missing() {
        let (state, _) = state(Ok("unused"), Locale::En).await;
        let params = CacheLookupParams { tool: "viral_score".into(), content_hash: "a".repeat(64) };

        let err = lookup_impl(&state, params).await.unwrap_err();
        assert!(err.message.contains("CACHE_MISS"));
    }

    #[tokio::test]
    async fn test_lookup_rejects_bad_hash() {
        let (state, _) = state(Ok("unused"), Locale::En).await;
        let params = CacheLookupParams { tool: "viral_score".into(), content_hash: "nonexistent".into() };

        let err = lookup_impl(&state, params).await.unwrap_err();
        assert!(err.message.contains("invalid hash"));
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let (state, _) = state(Ok("unused"), Locale::En).await;
        let request = AnalysisRequest::new(&["A post about launching in public every week"]);
        state
            .db
            .store_entry(&CacheEntry::new("viral-potential-scorer-v1", &request.content_hash, "Score: 55/100\nOkay."))
            .await
            .unwrap();

        let params = CacheLookupParams { tool: "viral_score".into(), content_hash: request.content_hash.clone() };
        let out = body(&lookup_impl(&state, params).await.unwrap());

        assert_eq!(out["entry"]["content_hash"], request.content_hash.as_str());
        assert_eq!(out["entry"]["analysis_text"], "Score: 55/100\nOkay.");
        assert!(out["markdown"].as_str().unwrap().contains("## Score: 55/100"));
    }

    #[tokio::test]
    async fn test_lookup_is_scoped_per_tool() {
        let (state, _) = state(Ok("unused"), Locale::En).await;
        let request = AnalysisRequest::new(&["A post about launching in public every week"]);
        state
            .db
            .store_entry(&CacheEntry::new("viral-potential-scorer-v1", &request.content_hash, "Score: 55/100"))
            .await
            .unwrap();

        let params = CacheLookupParams { tool: "missing_topics".into(), content_hash: request.content_hash };
        assert!(lookup_impl(&state, params).await.is_err());
    }
}
