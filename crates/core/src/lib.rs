//! Core types and shared functionality for quill.
//!
//! This crate provides:
//! - Input normalization and content fingerprints
//! - SQLite store for cached analyses and analytics
//! - Per-session context
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod session;

pub use cache::{Analytics, CacheDb, CacheEntry, ResultCache, VisitEvent};
pub use config::{AppConfig, ConfigError, Locale};
pub use error::{Error, ErrorKind};
pub use fingerprint::{AnalysisRequest, fingerprint, normalize};
pub use session::SessionContext;
