//! Gemini generateContent response types.

use serde::Deserialize;

/// Raw response body. Only the fields used for text extraction are modeled.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any are non-empty.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }

    /// Why no text came back, for logs and error messages.
    pub fn empty_reason(&self) -> String {
        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
            return format!("prompt blocked: {reason}");
        }
        match self.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
            Some(reason) => format!("finish reason {reason}"),
            None => "no candidates".to_string(),
        }
    }
}
