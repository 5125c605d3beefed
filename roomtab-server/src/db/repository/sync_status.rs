//! Sync Status Repository
//!
//! One row per (provider, resource) pair, overwritten on every
//! reconciliation pass. No history is retained.

use super::RepoResult;
use shared::models::{SyncOutcome, SyncStatusRecord};
use sqlx::SqlitePool;

pub async fn upsert(
    pool: &SqlitePool,
    provider: &str,
    resource: &str,
    status: SyncOutcome,
    details: Option<String>,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO sync_status (provider, resource, last_sync_at, status, details) \
         VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT (provider, resource) DO UPDATE SET \
         last_sync_at = excluded.last_sync_at, status = excluded.status, \
         details = excluded.details",
    )
    .bind(provider)
    .bind(resource)
    .bind(now)
    .bind(status)
    .bind(details)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(
    pool: &SqlitePool,
    provider: &str,
    resource: &str,
) -> RepoResult<Option<SyncStatusRecord>> {
    let row = sqlx::query_as::<_, SyncStatusRecord>(
        "SELECT provider, resource, last_sync_at, status, details FROM sync_status \
         WHERE provider = ? AND resource = ?",
    )
    .bind(provider)
    .bind(resource)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<SyncStatusRecord>> {
    let rows = sqlx::query_as::<_, SyncStatusRecord>(
        "SELECT provider, resource, last_sync_at, status, details FROM sync_status \
         ORDER BY provider, resource",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
