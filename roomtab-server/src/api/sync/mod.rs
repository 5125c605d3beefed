//! Sync API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/sync", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", post(handler::trigger_catalog_sync))
        .route("/status", get(handler::get_sync_status))
}
