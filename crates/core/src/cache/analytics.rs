//! Page-view and click analytics.
//!
//! Visits are appended to `visits`; aggregate counters live in
//! `app_analytics`, one row per scope, created on first increment.

use super::connection::CacheDb;
use crate::Error;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A single session's first view of a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitEvent {
    pub visitor_id: String,
    pub scope_id: String,
}

/// Whether a recorded visit came from a visitor already seen for that scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
    Unique,
    Returning,
}

/// Counter columns in `app_analytics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    UniqueVisitors,
    ReturningVisitors,
    CtaClicks,
}

impl Counter {
    fn column(self) -> &'static str {
        match self {
            Counter::Views => "views",
            Counter::UniqueVisitors => "unique_visitors",
            Counter::ReturningVisitors => "returning_visitors",
            Counter::CtaClicks => "cta_clicks",
        }
    }
}

/// Current counter values for a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsCounters {
    pub views: u64,
    pub unique_visitors: u64,
    pub returning_visitors: u64,
    pub cta_clicks: u64,
}

/// Analytics side-channel. Callers treat every failure as non-fatal.
#[async_trait]
pub trait Analytics: Send + Sync {
    /// Log a visit and bump the view and visitor counters.
    async fn track_visit(&self, visit: &VisitEvent) -> Result<VisitKind, Error>;

    /// Bump the primary-action click counter.
    async fn increment_cta(&self, scope_id: &str) -> Result<(), Error>;
}

impl CacheDb {
    /// Add one to a counter, creating the scope row if needed.
    pub async fn increment_counter(&self, scope_id: &str, counter: Counter) -> Result<(), Error> {
        let scope_id = scope_id.to_string();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                bump(conn, &scope_id, counter, &now)?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Read the counters for a scope; zeroes if it was never touched.
    pub async fn counters(&self, scope_id: &str) -> Result<AnalyticsCounters, Error> {
        let scope_id = scope_id.to_string();
        self.conn
            .call(move |conn| -> Result<AnalyticsCounters, Error> {
                let result = conn.query_row(
                    "SELECT views, unique_visitors, returning_visitors, cta_clicks
                     FROM app_analytics WHERE scope_id = ?1",
                    params![scope_id],
                    |row| {
                        Ok(AnalyticsCounters {
                            views: row.get::<_, i64>(0)? as u64,
                            unique_visitors: row.get::<_, i64>(1)? as u64,
                            returning_visitors: row.get::<_, i64>(2)? as u64,
                            cta_clicks: row.get::<_, i64>(3)? as u64,
                        })
                    },
                );

                match result {
                    Ok(counters) => Ok(counters),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(AnalyticsCounters::default()),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert a visit row and bump `views` plus the unique or returning
    /// counter, all in one transaction.
    async fn record_visit(&self, visit: &VisitEvent) -> Result<VisitKind, Error> {
        let visit = visit.clone();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<VisitKind, Error> {
                let tx = conn.transaction()?;
                let seen: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM visits WHERE scope_id = ?1 AND visitor_id = ?2)",
                    params![visit.scope_id, visit.visitor_id],
                    |row| row.get(0),
                )?;
                tx.execute(
                    "INSERT INTO visits (visitor_id, scope_id, visited_at) VALUES (?1, ?2, ?3)",
                    params![visit.visitor_id, visit.scope_id, now],
                )?;

                let kind = if seen { VisitKind::Returning } else { VisitKind::Unique };
                let counter = match kind {
                    VisitKind::Unique => Counter::UniqueVisitors,
                    VisitKind::Returning => Counter::ReturningVisitors,
                };
                bump(&tx, &visit.scope_id, Counter::Views, &now)?;
                bump(&tx, &visit.scope_id, counter, &now)?;

                tx.commit()?;
                Ok(kind)
            })
            .await
            .map_err(Error::from)
    }
}

fn bump(conn: &rusqlite::Connection, scope_id: &str, counter: Counter, now: &str) -> rusqlite::Result<()> {
    let sql = format!(
        "INSERT INTO app_analytics (scope_id, {col}, updated_at) VALUES (?1, 1, ?2)
         ON CONFLICT(scope_id) DO UPDATE SET {col} = {col} + 1, updated_at = excluded.updated_at",
        col = counter.column()
    );
    conn.execute(&sql, params![scope_id, now])?;
    Ok(())
}

#[async_trait]
impl Analytics for CacheDb {
    async fn track_visit(&self, visit: &VisitEvent) -> Result<VisitKind, Error> {
        self.record_visit(visit).await
    }

    async fn increment_cta(&self, scope_id: &str) -> Result<(), Error> {
        self.increment_counter(scope_id, Counter::CtaClicks).await
    }
}
