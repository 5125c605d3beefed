//! Server Implementation
//!
//! HTTP server startup, background workers and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::SyncWorker;
use crate::core::{AppState, Config};
use crate::utils::AppError;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<AppState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for tests and embedding)
    pub fn with_state(config: Config, state: AppState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(self) -> Result<(), AppError> {
        let state = match self.state {
            Some(s) => s,
            None => AppState::initialize(&self.config).await?,
        };

        // Background catalog sync worker
        let shutdown = CancellationToken::new();
        let worker = SyncWorker::new(
            Arc::clone(&state.reconciler),
            Duration::from_secs(state.config.catalog_sync_interval_secs),
            shutdown.clone(),
        );
        let worker_handle = tokio::spawn(worker.run());

        let app = crate::api::router()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(30)))
            .layer(CorsLayer::permissive())
            .with_state(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("RoomTab server listening on {addr}");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind {addr}: {e}")))?;

        let shutdown_signal = shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                shutdown_signal.cancel();
            })
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {e}")))?;

        // Let the worker flush its current pass before exiting
        shutdown.cancel();
        let _ = worker_handle.await;

        Ok(())
    }
}
