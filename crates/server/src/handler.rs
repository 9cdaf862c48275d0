//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    ConversionPathParams, ListAnalyzersParams, MissingTopicsParams, ViralScoreParams,
    cache::{CacheLookupParams, lookup_impl},
    conversion_path_impl, list_impl, missing_topics_impl, viral_score_impl,
};

use quill_client::Analyzer;
use quill_core::{CacheDb, Locale, SessionContext};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// Everything a tool call needs. Built once at startup.
pub struct ServerState {
    pub analyzer: Analyzer,
    pub db: CacheDb,
    /// One stdio connection is one session.
    pub session: SessionContext,
    pub locale: Locale,
}

/// The main MCP server handler for quill.
#[derive(Clone)]
pub struct QuillServer {
    state: Arc<ServerState>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl QuillServer {
    /// Create a new server handler.
    pub fn new(state: ServerState) -> Self {
        Self { state: Arc::new(state), tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Score the viral potential of a social media post from 0 to 100 and explain the score. \
                       Identical posts are answered from cache."
    )]
    async fn viral_score(&self, params: Parameters<ViralScoreParams>) -> Result<CallToolResult, McpError> {
        viral_score_impl(&self.state, params.0).await
    }

    #[tool(
        description = "Design a 3-step micro-conversion path (call to action, lead magnet, follow-up message) \
                       for a content topic and a final offer."
    )]
    async fn conversion_path(&self, params: Parameters<ConversionPathParams>) -> Result<CallToolResult, McpError> {
        conversion_path_impl(&self.state, params.0).await
    }

    #[tool(
        description = "Content gap analysis: compare your recent posts with a competitor's and suggest missing \
                       topics, why each is an opportunity, and the best format for it."
    )]
    async fn missing_topics(&self, params: Parameters<MissingTopicsParams>) -> Result<CallToolResult, McpError> {
        missing_topics_impl(&self.state, params.0).await
    }

    #[tool(description = "Describe the available analysis tools, their input fields and minimum lengths.")]
    async fn list_analyzers(&self, params: Parameters<ListAnalyzersParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.state, params.0).await
    }

    #[tool(description = "Read a stored analysis by tool name and content hash. Fails with CACHE_MISS if absent.")]
    async fn cache_lookup(&self, params: Parameters<CacheLookupParams>) -> Result<CallToolResult, McpError> {
        lookup_impl(&self.state, params.0).await
    }
}

impl ServerHandler for QuillServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "quill".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Marketing content analysis. Call list_analyzers for help, then viral_score, conversion_path \
                 or missing_topics. Results carry a rendered markdown field."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::analyze::tests::state;

    #[tokio::test]
    async fn test_router_exposes_every_tool() {
        let (state, _) = state(Ok("unused"), Locale::En).await;
        let server = QuillServer::new(state);

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();

        assert_eq!(names, ["cache_lookup", "conversion_path", "list_analyzers", "missing_topics", "viral_score"]);
    }

    #[tokio::test]
    async fn test_server_info() {
        let (state, _) = state(Ok("unused"), Locale::En).await;
        let info = QuillServer::new(state).get_info();
        assert_eq!(info.server_info.name, "quill");
        assert!(info.capabilities.tools.is_some());
    }
}
