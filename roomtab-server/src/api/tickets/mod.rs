//! Ticket API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/tickets", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{room}", get(handler::get_by_room))
        .route("/{room}/items", post(handler::add_items))
        .route("/{room}/checkout", post(handler::checkout))
}
