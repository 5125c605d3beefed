//! Health Check

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let database = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .is_ok();

    Json(HealthStatus {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}
