//! Shared body of the analysis tools.
//!
//! Validation problems come back as a successful call with `status: warning`
//! and a localized message naming the field. Remote and parse failures come
//! back as an error result carrying only the generic message for their kind.

use quill_client::analysis::{Variant, generic_message, render_markdown, user_message};
use quill_client::Analysis;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::ToolError;
use crate::handler::ServerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    Warning,
    Error,
}

/// Output document of an analysis tool.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeOutput {
    pub status: Status,
    pub tool: &'static str,
    pub scope_id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    /// Rendered results area.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    /// Localized warning or error text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalyzeOutput {
    fn failed(variant: &Variant, status: Status, message: String) -> Self {
        Self {
            status,
            tool: variant.tool,
            scope_id: variant.scope_id,
            content_hash: None,
            from_cache: false,
            analysis: None,
            markdown: None,
            message: Some(message),
        }
    }
}

/// Run `variant` on `fields` and package the outcome for the caller.
pub async fn analyze_impl(
    state: &ServerState, variant: &'static Variant, fields: Vec<String>,
) -> Result<CallToolResult, McpError> {
    let locale = state.locale;

    match state.analyzer.analyze(&state.session, variant, &fields).await {
        Ok(outcome) => {
            let markdown = render_markdown(variant, &outcome.analysis, outcome.from_cache, locale);
            let output = AnalyzeOutput {
                status: Status::Ok,
                tool: variant.tool,
                scope_id: outcome.scope_id,
                content_hash: Some(outcome.content_hash),
                from_cache: outcome.from_cache,
                analysis: Some(outcome.analysis),
                markdown: Some(markdown),
                message: None,
            };
            Ok(CallToolResult::success(vec![Content::text(to_json(&output)?)]))
        }
        Err(e) if e.is_validation() => {
            tracing::debug!(tool = variant.tool, error = %e, "input rejected");
            let output = AnalyzeOutput::failed(variant, Status::Warning, user_message(variant, &e, locale));
            Ok(CallToolResult::success(vec![Content::text(to_json(&output)?)]))
        }
        Err(e) => {
            tracing::error!(tool = variant.tool, kind = ?e.kind(), error = %e, "analysis failed");
            let message = generic_message(e.kind(), locale).to_string();
            let output = AnalyzeOutput::failed(variant, Status::Error, message);
            Ok(CallToolResult::error(vec![Content::text(to_json(&output)?)]))
        }
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, ToolError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use quill_client::analysis::variants::{MISSING_TOPICS, VIRAL_SCORE};
    use quill_client::{Analyzer, AnalyzerSettings, GeminiError, GenerateRequest, Generator};
    use quill_core::{CacheDb, Locale, SessionContext};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Generator that answers every call with the same result.
    pub(crate) struct StubGenerator {
        pub(crate) reply: Result<&'static str, u16>,
        pub(crate) calls: AtomicUsize,
    }

    #[async_trait]
    impl Generator for StubGenerator {
        async fn generate(&self, _request: &GenerateRequest) -> Result<String, GeminiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(429) => Err(GeminiError::RateLimited),
                Err(status) => Err(GeminiError::HttpError { status }),
            }
        }
    }

    pub(crate) async fn state(reply: Result<&'static str, u16>, locale: Locale) -> (ServerState, Arc<StubGenerator>) {
        let generator = Arc::new(StubGenerator { reply, calls: AtomicUsize::new(0) });
        let db = CacheDb::open_in_memory().await.unwrap();
        let analyzer = Analyzer::new(
            generator.clone(),
            Arc::new(db.clone()),
            Arc::new(db.clone()),
            AnalyzerSettings::default(),
        );
        let state = ServerState { analyzer, db, session: SessionContext::new(), locale };
        (state, generator)
    }

    pub(crate) fn body(result: &CallToolResult) -> serde_json::Value {
        let text = result.content[0].as_text().unwrap().text.clone();
        serde_json::from_str(&text).unwrap()
    }

    const POST: &str = "Nobody tells you this about launching your first course.";

    #[tokio::test]
    async fn test_success_then_cached() {
        let (state, generator) = state(Ok("Score: 64/100\nDecent hook."), Locale::En).await;

        let first = analyze_impl(&state, &VIRAL_SCORE, vec![POST.into()]).await.unwrap();
        let first = body(&first);
        assert_eq!(first["status"], "ok");
        assert_eq!(first["from_cache"], false);
        assert_eq!(first["analysis"]["headline"], "Score: 64/100");
        assert!(first["markdown"].as_str().unwrap().contains("## Score: 64/100"));

        let second = analyze_impl(&state, &VIRAL_SCORE, vec![format!("  {POST}  ")]).await.unwrap();
        let second = body(&second);
        assert_eq!(second["from_cache"], true);
        assert_eq!(second["content_hash"], first["content_hash"]);
        assert!(second["markdown"].as_str().unwrap().contains("Served from cache"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_input_is_a_warning() {
        let (state, generator) = state(Ok("unused"), Locale::En).await;

        let result = analyze_impl(&state, &MISSING_TOPICS, vec!["a few posts".into(), String::new()]).await.unwrap();

        assert!(!result.is_error.unwrap_or(false));
        let out = body(&result);
        assert_eq!(out["status"], "warning");
        assert!(out["message"].as_str().unwrap().contains("Competitor posts"));
        assert!(out.get("markdown").is_none());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_is_generic_error() {
        let (state, _generator) = state(Err(503), Locale::Ar).await;

        let result = analyze_impl(&state, &VIRAL_SCORE, vec![POST.into()]).await.unwrap();

        assert!(result.is_error.unwrap_or(false));
        let out = body(&result);
        assert_eq!(out["status"], "error");
        assert_eq!(out["message"], generic_message(quill_core::ErrorKind::Transport, Locale::Ar));
        assert!(!out["message"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_quota_failure_message() {
        let (state, _generator) = state(Err(429), Locale::En).await;

        let result = analyze_impl(&state, &VIRAL_SCORE, vec![POST.into()]).await.unwrap();

        let out = body(&result);
        assert_eq!(out["message"], generic_message(quill_core::ErrorKind::Quota, Locale::En));
    }
}
