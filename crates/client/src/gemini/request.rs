//! Gemini generateContent request types.
//!
//! Wire format: `{systemInstruction, contents, generationConfig}` with
//! camelCase keys, as documented at
//! https://ai.google.dev/api/generate-content

use serde::Serialize;
use serde_json::Value;

use crate::gemini::GeminiError;

/// Sampling parameters sent in `generationConfig`.
///
/// `None` leaves the service default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl SamplingConfig {
    /// Leave every sampling knob at the service default.
    pub const fn service_default() -> Self {
        Self { temperature: None, top_p: None, top_k: None, max_output_tokens: None }
    }

    /// Lowest-variance settings the API exposes. Repeated calls still may
    /// differ; only the cache makes results reproducible.
    pub const fn minimal_variance() -> Self {
        Self { temperature: Some(0.0), top_p: Some(0.1), top_k: Some(1), max_output_tokens: None }
    }
}

/// A single-turn generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Role, task, output language and format constraints.
    pub system_instruction: String,
    /// The user turn: fixed framing plus the user's text.
    pub prompt: String,
    pub sampling: SamplingConfig,
    /// When set, the service is asked for `application/json` matching this schema.
    pub response_schema: Option<Value>,
}

impl GenerateRequest {
    pub fn validate(&self) -> Result<(), GeminiError> {
        if self.system_instruction.trim().is_empty() {
            return Err(GeminiError::InvalidRequest("system instruction cannot be empty".into()));
        }
        if self.prompt.trim().is_empty() {
            return Err(GeminiError::InvalidRequest("prompt cannot be empty".into()));
        }
        if let Some(schema) = &self.response_schema
            && !schema.is_object()
        {
            return Err(GeminiError::InvalidRequest("response schema must be an object".into()));
        }
        Ok(())
    }

    /// Build the JSON body for `models/{model}:generateContent`.
    pub fn body(&self) -> RequestBody<'_> {
        RequestBody {
            system_instruction: WireContent { role: None, parts: vec![WirePart { text: &self.system_instruction }] },
            contents: vec![WireContent { role: Some("user"), parts: vec![WirePart { text: &self.prompt }] }],
            generation_config: GenerationConfig {
                sampling: self.sampling,
                response_mime_type: self.response_schema.as_ref().map(|_| "application/json"),
                response_schema: self.response_schema.as_ref(),
            },
        }
    }
}

/// Serialized request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody<'a> {
    system_instruction: WireContent<'a>,
    contents: Vec<WireContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(flatten)]
    sampling: SamplingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
}
