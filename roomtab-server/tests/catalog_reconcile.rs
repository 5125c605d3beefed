//! Catalog reconciliation: mark-and-sweep behavior, failure semantics and
//! the sync status audit record.

mod common;

use common::{MockPos, remote_item, test_pool};
use roomtab_server::catalog::{CatalogReconciler, SyncError};
use roomtab_server::db::repository::{catalog_item, sync_status};
use shared::models::SyncOutcome;
use std::sync::Arc;
use std::sync::atomic::Ordering;

const GRACE_MS: i64 = 5_000;

fn reconciler(pool: sqlx::SqlitePool, pos: Arc<MockPos>) -> CatalogReconciler {
    CatalogReconciler::with_params(pool, pos, "EUR".to_string(), GRACE_MS)
}

/// Backdate a row's heartbeat so the sweep can see it as stale.
async fn backdate(pool: &sqlx::SqlitePool, external_id: &str, by_ms: i64) {
    sqlx::query("UPDATE catalog_item SET updated_at = updated_at - ? WHERE external_id = ?")
        .bind(by_ms)
        .bind(external_id)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn initial_pass_inserts_and_normalizes() {
    let pool = test_pool().await;
    let pos = Arc::new(MockPos::with_items(vec![
        remote_item("A", "Club Sandwich", 1250, "EUR", Some("cat-1")),
        remote_item("B", "Imported Soda", 450, "USD", None),
    ]));
    pos.set_categories(vec![("cat-1", "Room Dining")]);

    let report = reconciler(pool.clone(), pos).reconcile().await.unwrap();
    assert_eq!(report.added, 2);
    assert_eq!(report.updated, 0);
    assert_eq!(report.disabled, 0);
    assert_eq!(report.errors, 0);

    let a = catalog_item::find_by_external_id(&pool, "A")
        .await
        .unwrap()
        .unwrap();
    // Home currency minor units pass through
    assert_eq!(a.price, 1250);
    assert_eq!(a.category_name, "Room Dining");
    assert!(a.is_present);
    assert!(a.is_active);
    assert_eq!(a.image, "img://A");

    // Foreign currency amounts are divided by 100
    let b = catalog_item::find_by_external_id(&pool, "B")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(b.price, 4);
    assert_eq!(b.category_name, "");
}

#[tokio::test]
async fn category_fetch_failure_degrades_to_raw_ids() {
    let pool = test_pool().await;
    let pos = Arc::new(MockPos::with_items(vec![remote_item(
        "A",
        "Club Sandwich",
        1250,
        "EUR",
        Some("cat-9"),
    )]));
    pos.fail_categories.store(true, Ordering::SeqCst);

    reconciler(pool.clone(), pos).reconcile().await.unwrap();

    let a = catalog_item::find_by_external_id(&pool, "A")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a.category_name, "cat-9");
}

#[tokio::test]
async fn sweep_soft_deletes_items_missing_from_snapshot() {
    let pool = test_pool().await;
    let pos = Arc::new(MockPos::with_items(vec![
        remote_item("A", "Sandwich", 1000, "EUR", None),
        remote_item("B", "Soup", 800, "EUR", None),
        remote_item("C", "Retired Dish", 900, "EUR", None),
    ]));
    let reconciler = reconciler(pool.clone(), pos.clone());
    reconciler.reconcile().await.unwrap();

    // C disappears from the remote snapshot; its heartbeat is old enough
    // to fall outside the grace window
    pos.set_items(vec![
        remote_item("A", "Sandwich", 1000, "EUR", None),
        remote_item("B", "Soup", 800, "EUR", None),
    ]);
    backdate(&pool, "C", GRACE_MS + 60_000).await;

    let report = reconciler.reconcile().await.unwrap();
    assert_eq!(report.added, 0);
    assert_eq!(report.updated, 2);
    assert_eq!(report.disabled, 1);

    let c = catalog_item::find_by_external_id(&pool, "C")
        .await
        .unwrap()
        .unwrap();
    assert!(!c.is_present);
    // The sweep never touches storefront visibility
    assert!(c.is_active);

    for id in ["A", "B"] {
        let row = catalog_item::find_by_external_id(&pool, id)
            .await
            .unwrap()
            .unwrap();
        assert!(row.is_present, "{id} should still be present");
    }
}

#[tokio::test]
async fn grace_window_protects_recently_observed_items() {
    let pool = test_pool().await;
    let pos = Arc::new(MockPos::with_items(vec![
        remote_item("A", "Sandwich", 1000, "EUR", None),
        remote_item("C", "Slow Item", 900, "EUR", None),
    ]));
    let reconciler = reconciler(pool.clone(), pos.clone());
    reconciler.reconcile().await.unwrap();

    // C vanishes but was observed moments ago: still inside the grace
    // window, so the sweep must leave it alone
    pos.set_items(vec![remote_item("A", "Sandwich", 1000, "EUR", None)]);
    let report = reconciler.reconcile().await.unwrap();
    assert_eq!(report.disabled, 0);

    let c = catalog_item::find_by_external_id(&pool, "C")
        .await
        .unwrap()
        .unwrap();
    assert!(c.is_present);
}

#[tokio::test]
async fn heartbeat_advances_even_when_nothing_changed() {
    let pool = test_pool().await;
    let pos = Arc::new(MockPos::with_items(vec![remote_item(
        "A", "Sandwich", 1000, "EUR", None,
    )]));
    let reconciler = reconciler(pool.clone(), pos);
    reconciler.reconcile().await.unwrap();

    let before = catalog_item::find_by_external_id(&pool, "A")
        .await
        .unwrap()
        .unwrap()
        .updated_at;

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let report = reconciler.reconcile().await.unwrap();
    assert_eq!(report.updated, 1);

    let after = catalog_item::find_by_external_id(&pool, "A")
        .await
        .unwrap()
        .unwrap()
        .updated_at;
    assert!(after > before, "heartbeat must advance on every observation");
}

#[tokio::test]
async fn fetch_failure_aborts_pass_and_leaves_mirror_untouched() {
    let pool = test_pool().await;
    let pos = Arc::new(MockPos::with_items(vec![
        remote_item("A", "Sandwich", 1000, "EUR", None),
        remote_item("B", "Soup", 800, "EUR", None),
    ]));
    let reconciler = reconciler(pool.clone(), pos.clone());
    reconciler.reconcile().await.unwrap();
    backdate(&pool, "A", GRACE_MS + 60_000).await;
    backdate(&pool, "B", GRACE_MS + 60_000).await;

    pos.fail_items.store(true, Ordering::SeqCst);
    let err = reconciler.reconcile().await.unwrap_err();
    assert!(matches!(err, SyncError::Fetch(_)));

    // Nothing was swept or modified, even though both rows look stale
    for id in ["A", "B"] {
        let row = catalog_item::find_by_external_id(&pool, id)
            .await
            .unwrap()
            .unwrap();
        assert!(row.is_present);
    }

    let record = sync_status::find(&pool, "pos", "products")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, SyncOutcome::Error);
}

#[tokio::test]
async fn empty_snapshot_is_an_error_not_a_mass_delete() {
    let pool = test_pool().await;
    let pos = Arc::new(MockPos::with_items(vec![remote_item(
        "A", "Sandwich", 1000, "EUR", None,
    )]));
    let reconciler = reconciler(pool.clone(), pos.clone());
    reconciler.reconcile().await.unwrap();
    backdate(&pool, "A", GRACE_MS + 60_000).await;

    // POS outage that still answers 200 with an empty list
    pos.set_items(Vec::new());
    let err = reconciler.reconcile().await.unwrap_err();
    assert!(matches!(err, SyncError::EmptySnapshot));

    let a = catalog_item::find_by_external_id(&pool, "A")
        .await
        .unwrap()
        .unwrap();
    assert!(a.is_present, "empty snapshot must not sweep the mirror");

    let record = sync_status::find(&pool, "pos", "products")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, SyncOutcome::Error);
}

#[tokio::test]
async fn malformed_items_cost_an_error_but_not_the_pass() {
    let pool = test_pool().await;
    let pos = Arc::new(MockPos::with_items(vec![
        remote_item("A", "Sandwich", 1000, "EUR", None),
        remote_item("", "No External Id", 100, "EUR", None),
    ]));

    let report = reconciler(pool.clone(), pos).reconcile().await.unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(report.errors, 1);

    let record = sync_status::find(&pool, "pos", "products")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, SyncOutcome::Success);
    assert!(record.details.unwrap().contains("\"errors\":1"));
}

#[tokio::test]
async fn successful_pass_records_success_status() {
    let pool = test_pool().await;
    let pos = Arc::new(MockPos::with_items(vec![remote_item(
        "A", "Sandwich", 1000, "EUR", None,
    )]));
    reconciler(pool.clone(), pos).reconcile().await.unwrap();

    let record = sync_status::find(&pool, "pos", "products")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, SyncOutcome::Success);
    assert!(record.last_sync_at > 0);

    let all = sync_status::find_all(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
}
