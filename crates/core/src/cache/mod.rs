//! SQLite-backed store for analysis results and the analytics side-channel.
//!
//! This module provides a persistent, content-addressed cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Analysis results keyed by `(scope_id, content_hash)`
//! - Append-only visit log and per-scope counters
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//!
//! Nothing here ever deletes a row.

pub mod analysis;
pub mod analytics;
pub mod connection;
pub mod migrations;

pub use crate::Error;

pub use analysis::{CacheEntry, ResultCache};
pub use analytics::{Analytics, AnalyticsCounters, Counter, VisitEvent, VisitKind};
pub use connection::CacheDb;
