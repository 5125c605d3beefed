//! Catalog Sync Models

use serde::{Deserialize, Serialize};

/// Aggregate result of one catalog reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// New mirror rows inserted
    pub added: u64,
    /// Existing rows observed and refreshed
    pub updated: u64,
    /// Rows soft-deleted by the staleness sweep
    pub disabled: u64,
    /// Items that failed to process (pass continues)
    pub errors: u64,
}

/// Outcome of a reconciliation pass as recorded for operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type), sqlx(rename_all = "lowercase"))]
pub enum SyncOutcome {
    Success,
    Error,
}

/// Per-(provider, resource) sync audit record. Upserted once per pass; no
/// history is retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SyncStatusRecord {
    pub provider: String,
    pub resource: String,
    pub last_sync_at: i64,
    pub status: SyncOutcome,
    /// Free-form diagnostic payload (JSON)
    pub details: Option<String>,
}
