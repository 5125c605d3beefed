//! Sync API Handlers

use axum::{Json, extract::State};

use crate::core::AppState;
use crate::db::repository::sync_status;
use crate::utils::AppResult;
use shared::models::{SyncReport, SyncStatusRecord};

/// POST /api/sync/catalog - run one reconciliation pass now
///
/// Administrative trigger; the background worker runs the same pass on an
/// interval. Returns aggregate counts, not per-item detail.
pub async fn trigger_catalog_sync(State(state): State<AppState>) -> AppResult<Json<SyncReport>> {
    let report = state.reconciler.reconcile().await?;
    Ok(Json(report))
}

/// GET /api/sync/status - last recorded outcome per (provider, resource)
pub async fn get_sync_status(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SyncStatusRecord>>> {
    let records = sync_status::find_all(&state.pool).await?;
    Ok(Json(records))
}
