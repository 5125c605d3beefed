//! Catalog API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::AppState;
use crate::db::repository::catalog_item;
use crate::utils::AppResult;
use shared::models::{CatalogItem, CatalogItemActiveUpdate};

/// GET /api/catalog - storefront listing (present and active items)
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CatalogItem>>> {
    let items = catalog_item::list_storefront(&state.pool).await?;
    Ok(Json(items))
}

/// PUT /api/catalog/:id/active - toggle storefront visibility
///
/// Only flips `is_active`; the reconciler-owned `is_present` flag is never
/// touched from here.
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CatalogItemActiveUpdate>,
) -> AppResult<Json<CatalogItem>> {
    let item = catalog_item::set_active(&state.pool, id, payload.is_active).await?;
    Ok(Json(item))
}
