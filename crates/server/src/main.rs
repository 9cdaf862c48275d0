//! quill server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use quill_client::{Analyzer, AnalyzerSettings, GeminiClient, GeminiConfig};
use quill_core::{AppConfig, CacheDb, SessionContext};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let gemini = GeminiConfig::from_app_config(&config).context("QUILL_GEMINI_API_KEY must be set")?;
    let generator = GeminiClient::new(gemini).context("failed to build Gemini client")?;
    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open cache at {}", config.db_path.display()))?;

    let analyzer = Analyzer::new(
        Arc::new(generator),
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        AnalyzerSettings { output_language: config.output_language.clone(), analytics_enabled: config.analytics_enabled },
    );

    let session = SessionContext::new();
    tracing::info!(
        model = %config.model,
        db_path = %config.db_path.display(),
        visitor_id = session.visitor_id(),
        "Starting quill server on stdio transport"
    );

    let state = handler::ServerState { analyzer, db, session, locale: config.locale };
    let server = serve_server(handler::QuillServer::new(state), stdio()).await?;

    server.waiting().await?;

    Ok(())
}
