//! Turning generated text into an [`Analysis`].
//!
//! The same extraction runs on fresh output and on cached text, so a cached
//! result is shown exactly the way it was the first time.

use quill_core::Error;
use serde::Serialize;
use serde_json::Value;

use super::variants::OutputFormat;

/// A usable analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum Analysis {
    /// Free-text output: first non-empty line plus the full body.
    Text { headline: String, body: String },
    /// Schema-constrained output.
    Structured { data: Value },
}

impl Analysis {
    /// The string persisted in the cache for this result.
    pub fn cache_text(&self) -> String {
        match self {
            Analysis::Text { body, .. } => body.clone(),
            Analysis::Structured { data } => data.to_string(),
        }
    }

    pub fn headline(&self) -> Option<&str> {
        match self {
            Analysis::Text { headline, .. } => Some(headline),
            Analysis::Structured { .. } => None,
        }
    }
}

/// Extract an analysis from raw generated text.
///
/// Structured output must be a JSON object carrying every key listed in the
/// schema's `required` array. The raw text is logged on failure and never
/// included in the returned error.
pub fn extract(format: &OutputFormat, raw: &str) -> Result<Analysis, Error> {
    match format {
        OutputFormat::FreeText => extract_text(raw),
        OutputFormat::Structured { schema } => extract_structured(&schema(), raw),
    }
}

fn extract_text(raw: &str) -> Result<Analysis, Error> {
    let body = raw.trim();
    let headline = body
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| Error::Parse("empty text response".into()))?;

    Ok(Analysis::Text { headline: headline.to_string(), body: body.to_string() })
}

fn extract_structured(schema: &Value, raw: &str) -> Result<Analysis, Error> {
    let data: Value = match serde_json::from_str(raw.trim()) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(raw = %raw, error = %e, "model did not return valid JSON");
            return Err(Error::Parse(format!("invalid JSON: {e}")));
        }
    };

    let Some(object) = data.as_object() else {
        tracing::warn!(raw = %raw, "model returned JSON that is not an object");
        return Err(Error::Parse("expected a JSON object".into()));
    };

    let missing: Vec<&str> = schema["required"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .filter(|key| !object.contains_key(*key))
        .collect();

    if !missing.is_empty() {
        tracing::warn!(raw = %raw, ?missing, "model JSON is missing required keys");
        return Err(Error::Parse(format!("missing required keys: {}", missing.join(", "))));
    }

    Ok(Analysis::Structured { data })
}
