//! API Routing
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`catalog`] - mirrored catalog (storefront read + visibility toggle)
//! - [`tickets`] - room ticket lifecycle
//! - [`sync`] - reconciliation trigger and status

pub mod catalog;
pub mod health;
pub mod sync;
pub mod tickets;

use axum::Router;

use crate::core::AppState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(catalog::router())
        .merge(tickets::router())
        .merge(sync::router())
}
