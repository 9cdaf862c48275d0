//! The cache-or-compute analysis pipeline.
//!
//! One call runs: validate → count the click → fingerprint → cache lookup →
//! (on miss) generate → extract → store → return. Lookups and stores are
//! best-effort; a broken cache only costs an extra generation. Nothing holds a
//! lock between the lookup and the store, so two identical concurrent requests
//! may both generate and both upsert.

pub mod extract;
pub mod messages;
pub mod render;
pub mod variants;

pub use extract::{Analysis, extract};
pub use messages::{from_cache_caption, generic_message, user_message};
pub use render::render_markdown;
pub use variants::{FieldSpec, Layout, OutputFormat, Variant};

use std::sync::Arc;

use quill_core::{Analytics, AnalysisRequest, CacheEntry, Error, ResultCache, SessionContext, VisitEvent};

use crate::gemini::Generator;

/// Settings that shape every request.
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub output_language: String,
    pub analytics_enabled: bool,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self { output_language: "Arabic".into(), analytics_enabled: true }
    }
}

/// A successful analysis and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub scope_id: &'static str,
    pub content_hash: String,
    pub analysis: Analysis,
    pub from_cache: bool,
}

/// Runs analyses against a generator, a result cache and an analytics sink.
///
/// Constructed once at startup; all collaborators are injected.
pub struct Analyzer {
    generator: Arc<dyn Generator>,
    cache: Arc<dyn ResultCache>,
    analytics: Arc<dyn Analytics>,
    settings: AnalyzerSettings,
}

impl Analyzer {
    pub fn new(
        generator: Arc<dyn Generator>, cache: Arc<dyn ResultCache>, analytics: Arc<dyn Analytics>,
        settings: AnalyzerSettings,
    ) -> Self {
        Self { generator, cache, analytics, settings }
    }

    /// Record the session's first view of a variant. Later calls are no-ops.
    pub async fn open_variant(&self, session: &SessionContext, variant: &Variant) {
        if !self.settings.analytics_enabled || !session.first_visit(variant.scope_id) {
            return;
        }

        let visit = VisitEvent { visitor_id: session.visitor_id().to_string(), scope_id: variant.scope_id.to_string() };
        match self.analytics.track_visit(&visit).await {
            Ok(kind) => tracing::debug!(scope_id = variant.scope_id, ?kind, "visit tracked"),
            Err(e) => tracing::warn!(scope_id = variant.scope_id, error = %e, "failed to track visit"),
        }
    }

    /// Run one analysis for `fields`, in the variant's field order.
    ///
    /// # Errors
    ///
    /// Validation errors mean nothing was sent. Transport, quota and parse
    /// errors mean the generation failed and nothing was cached.
    pub async fn analyze(
        &self, session: &SessionContext, variant: &Variant, fields: &[String],
    ) -> Result<AnalysisOutcome, Error> {
        self.open_variant(session, variant).await;

        let request = AnalysisRequest::new(fields);
        variant.validate(&request)?;

        self.track_cta(variant).await;

        if let Some(analysis) = self.cached(variant, &request).await {
            return Ok(AnalysisOutcome {
                scope_id: variant.scope_id,
                content_hash: request.content_hash,
                analysis,
                from_cache: true,
            });
        }

        let generate_request = variant.build_request(&request.raw_input, &self.settings.output_language);
        let raw = self.generator.generate(&generate_request).await.map_err(|e| {
            let err = Error::from(e);
            tracing::warn!(scope_id = variant.scope_id, kind = ?err.kind(), error = %err, "generation failed");
            err
        })?;

        let analysis = extract(&variant.output, &raw)?;

        let entry = CacheEntry::new(variant.scope_id, &request.content_hash, analysis.cache_text());
        if let Err(e) = self.cache.store(&entry).await {
            tracing::warn!(scope_id = variant.scope_id, hash = %request.content_hash, error = %e, "cache write failed");
        }

        Ok(AnalysisOutcome { scope_id: variant.scope_id, content_hash: request.content_hash, analysis, from_cache: false })
    }

    async fn track_cta(&self, variant: &Variant) {
        if !self.settings.analytics_enabled {
            return;
        }
        if let Err(e) = self.analytics.increment_cta(variant.scope_id).await {
            tracing::warn!(scope_id = variant.scope_id, error = %e, "failed to count click");
        }
    }

    /// A usable cached analysis, if any. Read failures and unreadable rows
    /// count as misses.
    async fn cached(&self, variant: &Variant, request: &AnalysisRequest) -> Option<Analysis> {
        let text = match self.cache.lookup(variant.scope_id, &request.content_hash).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(scope_id = variant.scope_id, error = %e, "cache read failed");
                return None;
            }
        };

        match extract(&variant.output, &text) {
            Ok(analysis) => {
                tracing::debug!(scope_id = variant.scope_id, hash = %request.content_hash, "cache hit");
                Some(analysis)
            }
            Err(e) => {
                tracing::warn!(scope_id = variant.scope_id, error = %e, "cached entry unreadable, recomputing");
                None
            }
        }
    }
}
