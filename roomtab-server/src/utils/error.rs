//! Unified Error Handling
//!
//! Application-level error type and response structure for the HTTP edge.
//!
//! # Error code table
//!
//! | Code  | Meaning |
//! |-------|---------|
//! | E0000 | success |
//! | E0002 | validation failed |
//! | E0003 | resource not found |
//! | E0004 | resource conflict |
//! | E0005 | business rule violation |
//! | E9001 | internal error |
//! | E9002 | database error |
//! | E9003 | upstream POS unavailable |
//! | E9004 | upstream POS rejected the request |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Unified API response structure
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    // ========== Upstream (POS) Errors ==========
    #[error("Upstream service unavailable: {0}")]
    Upstream(String),

    #[error("Upstream service rejected request: {0}")]
    UpstreamRejected(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),

            // Business rule (422)
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }

            // Upstream unavailable (502)
            AppError::Upstream(msg) => {
                error!(target: "pos", error = %msg, "POS service unavailable");
                (StatusCode::BAD_GATEWAY, "E9003", "POS service unavailable")
            }

            // Upstream rejected (422)
            AppError::UpstreamRejected(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E9004", msg.as_str())
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

// ========== Conversions from component error types ==========

impl From<crate::db::repository::RepoError> for AppError {
    fn from(e: crate::db::repository::RepoError) -> Self {
        use crate::db::repository::RepoError;
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<crate::tickets::TicketError> for AppError {
    fn from(e: crate::tickets::TicketError) -> Self {
        use crate::tickets::TicketError;
        match e {
            TicketError::RemoteUnavailable(msg) => AppError::Upstream(msg),
            TicketError::RemoteRejected { status, message } => {
                AppError::UpstreamRejected(format!("POS returned {status}: {message}"))
            }
            TicketError::NoValidItems => {
                AppError::Validation("no valid line items in request".to_string())
            }
            TicketError::Store(repo) => repo.into(),
        }
    }
}

impl From<crate::catalog::SyncError> for AppError {
    fn from(e: crate::catalog::SyncError) -> Self {
        use crate::catalog::SyncError;
        match e {
            SyncError::EmptySnapshot => AppError::BusinessRule(e.to_string()),
            SyncError::Fetch(pos) => AppError::Upstream(pos.to_string()),
            SyncError::Store(repo) => repo.into(),
        }
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}
