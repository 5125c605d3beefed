//! CatalogReconciler — mark-and-sweep sync of the POS catalog
//!
//! One pass:
//! 1. fetch categories (non-fatal) and the full item snapshot (fatal)
//! 2. upsert every item inside a single transaction, marking it present
//! 3. bulk-advance the heartbeat of every observed row
//! 4. soft-delete rows whose heartbeat predates `sync_start - grace`
//! 5. commit, then record the outcome in `sync_status`
//!
//! The pass never partially commits: any store error rolls the whole
//! mutation set back. The `sync_status` record is written on every
//! outcome, outside the transaction, so operators always see pass results.

use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::Config;
use crate::db::repository::catalog_item::{self, ObservedItem};
use crate::db::repository::{RepoError, sync_status};
use crate::pos::{PosClient, PosError, RemoteCatalogItem};
use shared::models::{SyncOutcome, SyncReport};
use shared::util::now_millis;

const PROVIDER: &str = "pos";
const RESOURCE: &str = "products";

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to fetch remote catalog: {0}")]
    Fetch(#[from] PosError),

    /// An empty snapshot is treated as a failed fetch, never as "the
    /// catalog is genuinely empty". Sweeping on it would soft-delete the
    /// whole mirror during a POS outage that returns empty-but-200.
    #[error("remote catalog snapshot was empty, refusing to sweep")]
    EmptySnapshot,

    #[error("store error during reconciliation: {0}")]
    Store(#[from] RepoError),
}

pub struct CatalogReconciler {
    pool: SqlitePool,
    pos: Arc<dyn PosClient>,
    home_currency: String,
    grace_window_ms: i64,
}

impl CatalogReconciler {
    pub fn new(pool: SqlitePool, pos: Arc<dyn PosClient>, config: &Config) -> Self {
        Self::with_params(
            pool,
            pos,
            config.home_currency.clone(),
            (config.catalog_sweep_grace_secs as i64) * 1000,
        )
    }

    /// Construct with explicit parameters. The grace window must exceed
    /// the wall-clock duration of one full pass, so a slow pass does not
    /// falsely soft-delete items it simply had not reached yet.
    pub fn with_params(
        pool: SqlitePool,
        pos: Arc<dyn PosClient>,
        home_currency: String,
        grace_window_ms: i64,
    ) -> Self {
        Self {
            pool,
            pos,
            home_currency,
            grace_window_ms,
        }
    }

    /// Run one reconciliation pass.
    pub async fn reconcile(&self) -> Result<SyncReport, SyncError> {
        let sync_start = now_millis();

        // Category names first, in one shot rather than paged alongside
        // items. Failure degrades to using raw category ids as names.
        let categories: HashMap<String, String> = match self.pos.list_categories().await {
            Ok(cats) => cats.into_iter().map(|c| (c.id, c.name)).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Category fetch failed, using raw category ids");
                HashMap::new()
            }
        };

        let items = match self.pos.list_catalog_items().await {
            Ok(items) => items,
            Err(e) => {
                self.record_error(&e.to_string()).await;
                return Err(SyncError::Fetch(e));
            }
        };

        if items.is_empty() {
            tracing::warn!("Remote catalog returned zero items, skipping sweep");
            self.record_error("empty catalog snapshot").await;
            return Err(SyncError::EmptySnapshot);
        }

        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                let err = RepoError::from(e);
                self.record_error(&err.to_string()).await;
                return Err(SyncError::Store(err));
            }
        };

        match self
            .apply_snapshot(&mut tx, &items, &categories, sync_start)
            .await
        {
            Ok(report) => {
                if let Err(e) = tx.commit().await {
                    let err = RepoError::from(e);
                    self.record_error(&err.to_string()).await;
                    return Err(SyncError::Store(err));
                }
                let details =
                    serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string());
                self.record_outcome(SyncOutcome::Success, details).await;
                tracing::info!(
                    added = report.added,
                    updated = report.updated,
                    disabled = report.disabled,
                    errors = report.errors,
                    "Catalog reconciliation complete"
                );
                Ok(report)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    tracing::error!(error = %rb, "Rollback failed after reconciliation error");
                }
                self.record_error(&e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Merge the fetched snapshot into the mirror. Runs entirely inside
    /// the caller's transaction.
    async fn apply_snapshot(
        &self,
        conn: &mut SqliteConnection,
        items: &[RemoteCatalogItem],
        categories: &HashMap<String, String>,
        sync_start: i64,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        let mut observed: Vec<String> = Vec::with_capacity(items.len());

        for item in items {
            // A malformed item costs one error, not the pass
            if item.id.trim().is_empty() || item.name.trim().is_empty() {
                tracing::warn!(external_id = %item.id, "Skipping malformed remote item");
                report.errors += 1;
                continue;
            }

            let category_name = item
                .category_id
                .as_ref()
                .map(|id| categories.get(id).cloned().unwrap_or_else(|| id.clone()))
                .unwrap_or_default();

            let data = ObservedItem {
                external_id: item.id.clone(),
                name: item.name.clone(),
                description: item.description.clone(),
                category_id: item.category_id.clone(),
                category_name,
                price: normalize_price(item.price, &item.currency, &self.home_currency),
                image: item.image.clone().unwrap_or_default(),
                stock_quantity: item.stock_quantity,
            };

            let inserted = catalog_item::upsert_observed(&mut *conn, &data, now_millis()).await?;
            if inserted {
                report.added += 1;
            } else {
                report.updated += 1;
            }
            observed.push(data.external_id);
        }

        if observed.is_empty() {
            // Every fetched item was malformed: same trust problem as an
            // empty snapshot
            return Err(SyncError::EmptySnapshot);
        }

        // Heartbeat every observed row even when nothing changed:
        // "observed" is decoupled from "changed"
        catalog_item::touch_observed(&mut *conn, &observed, now_millis()).await?;

        report.disabled =
            catalog_item::sweep_stale(&mut *conn, sync_start - self.grace_window_ms).await?;

        Ok(report)
    }

    async fn record_error(&self, message: &str) {
        let details = serde_json::json!({ "error": message }).to_string();
        self.record_outcome(SyncOutcome::Error, details).await;
    }

    /// Write the pass outcome. Deliberately outside the transaction; a
    /// write failure here only logs and never masks the pass result.
    async fn record_outcome(&self, status: SyncOutcome, details: String) {
        if let Err(e) = sync_status::upsert(
            &self.pool,
            PROVIDER,
            RESOURCE,
            status,
            Some(details),
            now_millis(),
        )
        .await
        {
            tracing::error!(error = %e, "Failed to record sync status");
        }
    }
}

/// Remote minor-unit amounts are used as-is for the home currency; any
/// other currency is divided by 100 for a major-unit approximation.
fn normalize_price(amount: i64, currency: &str, home_currency: &str) -> i64 {
    if currency.eq_ignore_ascii_case(home_currency) {
        amount
    } else {
        amount / 100
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_price;

    #[test]
    fn home_currency_minor_units_pass_through() {
        assert_eq!(normalize_price(450, "EUR", "EUR"), 450);
        assert_eq!(normalize_price(450, "eur", "EUR"), 450);
    }

    #[test]
    fn foreign_currency_is_scaled_to_major_units() {
        assert_eq!(normalize_price(450, "USD", "EUR"), 4);
        assert_eq!(normalize_price(99, "USD", "EUR"), 0);
    }
}
