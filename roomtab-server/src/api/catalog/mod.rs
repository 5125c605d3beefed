//! Catalog API Module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/catalog", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/active", put(handler::set_active))
}
