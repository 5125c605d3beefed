//! SyncWorker — background worker that reconciles the catalog mirror
//!
//! Runs one pass on startup, then on a fixed interval until shutdown.
//! Failures are logged and retried at the next tick; the `sync_status`
//! record carries the details for operators.

use std::sync::Arc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use super::CatalogReconciler;

pub struct SyncWorker {
    reconciler: Arc<CatalogReconciler>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl SyncWorker {
    pub fn new(
        reconciler: Arc<CatalogReconciler>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            reconciler,
            interval,
            shutdown,
        }
    }

    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Catalog sync worker started"
        );

        // Initial pass on startup
        self.run_once().await;

        let mut interval = tokio::time::interval(self.interval);
        interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Catalog sync worker shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.run_once().await;
                }
            }
        }

        tracing::info!("Catalog sync worker stopped");
    }

    async fn run_once(&self) {
        if let Err(e) = self.reconciler.reconcile().await {
            tracing::error!("Catalog reconciliation failed: {e}");
        }
    }
}
