//! Per-session context.
//!
//! One stdio connection is one session. The context is created once when the
//! server starts and passed by reference into every tracking call.

use std::collections::HashSet;
use std::sync::Mutex;

/// Identifiers and visit bookkeeping for a single session.
#[derive(Debug)]
pub struct SessionContext {
    visitor_id: String,
    visited_scopes: Mutex<HashSet<String>>,
}

impl SessionContext {
    /// Start a new session with a random visitor id.
    pub fn new() -> Self {
        Self::with_visitor_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_visitor_id(visitor_id: impl Into<String>) -> Self {
        Self { visitor_id: visitor_id.into(), visited_scopes: Mutex::new(HashSet::new()) }
    }

    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    /// Mark `scope_id` as visited in this session.
    ///
    /// Returns `true` only the first time a scope is seen.
    pub fn first_visit(&self, scope_id: &str) -> bool {
        let mut visited = self.visited_scopes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        visited.insert(scope_id.to_string())
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
