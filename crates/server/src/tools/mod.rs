//! MCP tool implementations.
//!
//! This module contains all tools exposed by the quill server.

pub mod analyze;
pub mod analyzers;
pub mod cache;
pub mod conversion_path;
pub mod missing_topics;
pub mod viral_score;

pub use analyzers::{ListAnalyzersParams, list_impl};
pub use conversion_path::{ConversionPathParams, conversion_path_impl};
pub use missing_topics::{MissingTopicsParams, missing_topics_impl};
pub use viral_score::{ViralScoreParams, viral_score_impl};
