//! Analysis result cache.
//!
//! One row per `(scope_id, content_hash)`. Rows are written after a
//! successful generation and read before the next one.

use super::connection::CacheDb;
use crate::Error;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A stored analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheEntry {
    /// Logical application the entry belongs to.
    pub scope_id: String,
    /// Hex SHA-256 of the normalized input.
    pub content_hash: String,
    /// Analysis text exactly as it was returned to the user.
    pub analysis_text: String,
}

impl CacheEntry {
    pub fn new(scope_id: impl Into<String>, content_hash: impl Into<String>, analysis_text: impl Into<String>) -> Self {
        Self { scope_id: scope_id.into(), content_hash: content_hash.into(), analysis_text: analysis_text.into() }
    }
}

/// Read-before-compute, write-after-compute storage for analysis results.
///
/// A lookup miss is `Ok(None)`. Writes are upserts on the composite key, so
/// two concurrent identical requests at worst store equivalent text twice.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn lookup(&self, scope_id: &str, content_hash: &str) -> Result<Option<String>, Error>;

    async fn store(&self, entry: &CacheEntry) -> Result<(), Error>;
}

impl CacheDb {
    /// Fetch the analysis text for a composite key.
    pub async fn lookup_text(&self, scope_id: &str, content_hash: &str) -> Result<Option<String>, Error> {
        Ok(self.get_entry(scope_id, content_hash).await?.map(|e| e.analysis_text))
    }

    /// Fetch a full cache entry.
    pub async fn get_entry(&self, scope_id: &str, content_hash: &str) -> Result<Option<CacheEntry>, Error> {
        let scope_id = scope_id.to_string();
        let content_hash = content_hash.to_string();
        self.conn
            .call(move |conn| -> Result<Option<CacheEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT scope_id, content_hash, analysis_text FROM analysis_cache
                     WHERE scope_id = ?1 AND content_hash = ?2
                     LIMIT 1",
                )?;

                let result = stmt.query_row(params![scope_id, content_hash], |row| {
                    Ok(CacheEntry { scope_id: row.get(0)?, content_hash: row.get(1)?, analysis_text: row.get(2)? })
                });

                match result {
                    Ok(entry) => Ok(Some(entry)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite a cache entry.
    ///
    /// `created_at` is kept from the first insert; `updated_at` moves.
    pub async fn store_entry(&self, entry: &CacheEntry) -> Result<(), Error> {
        let entry = entry.clone();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO analysis_cache (scope_id, content_hash, analysis_text, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?4)
                    ON CONFLICT(scope_id, content_hash) DO UPDATE SET
                        analysis_text = excluded.analysis_text,
                        updated_at = excluded.updated_at",
                    params![entry.scope_id, entry.content_hash, entry.analysis_text, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Number of cached entries for a scope.
    pub async fn count_entries(&self, scope_id: &str) -> Result<u64, Error> {
        let scope_id = scope_id.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM analysis_cache WHERE scope_id = ?1",
                    params![scope_id],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl ResultCache for CacheDb {
    async fn lookup(&self, scope_id: &str, content_hash: &str) -> Result<Option<String>, Error> {
        self.lookup_text(scope_id, content_hash).await
    }

    async fn store(&self, entry: &CacheEntry) -> Result<(), Error> {
        self.store_entry(entry).await
    }
}
