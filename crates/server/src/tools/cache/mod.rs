//! Cache-related MCP tools.
//!
//! This module provides read access to the analysis cache.

pub mod lookup;

pub use lookup::{CacheLookupParams, lookup_impl};
