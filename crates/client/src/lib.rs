//! Client code for quill.
//!
//! This crate provides the Gemini API client, the catalogue of analysis
//! tools, and the cache-or-compute pipeline shared by the server.

pub mod analysis;
pub mod gemini;

pub use analysis::{Analysis, AnalysisOutcome, Analyzer, AnalyzerSettings, Variant, render_markdown, user_message};
pub use gemini::{GeminiClient, GeminiConfig, GeminiError, GenerateRequest, Generator, SamplingConfig};
