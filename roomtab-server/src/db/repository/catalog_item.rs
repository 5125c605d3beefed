//! Catalog Mirror Repository

use super::{RepoError, RepoResult};
use shared::models::CatalogItem;
use shared::util::snowflake_id;
use sqlx::{SqliteConnection, SqlitePool};

/// SQLite's default bound-parameter limit is 999; stay well under it when
/// building IN clauses.
const IN_CLAUSE_CHUNK: usize = 500;

/// One remote catalog item, currency-normalized and category-resolved,
/// ready to merge into the mirror.
#[derive(Debug, Clone)]
pub struct ObservedItem {
    pub external_id: String,
    pub name: String,
    pub description: String,
    pub category_id: Option<String>,
    pub category_name: String,
    /// Minor units of the home currency
    pub price: i64,
    /// Raw remote image reference; resolved later by a separate process
    pub image: String,
    /// None preserves the previously mirrored quantity
    pub stock_quantity: Option<i64>,
}

/// Upsert an observed remote item by `external_id`.
///
/// Existing rows are updated in place and re-marked present; new rows are
/// inserted present and storefront-active. Returns true when a new row was
/// inserted.
pub async fn upsert_observed(
    conn: &mut SqliteConnection,
    item: &ObservedItem,
    now: i64,
) -> RepoResult<bool> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM catalog_item WHERE external_id = ?")
            .bind(&item.external_id)
            .fetch_optional(&mut *conn)
            .await?;

    match existing {
        Some(_) => {
            sqlx::query(
                "UPDATE catalog_item SET name = ?, description = ?, category_id = ?, \
                 category_name = ?, price = ?, image = ?, \
                 stock_quantity = COALESCE(?, stock_quantity), is_present = 1, updated_at = ? \
                 WHERE external_id = ?",
            )
            .bind(&item.name)
            .bind(&item.description)
            .bind(&item.category_id)
            .bind(&item.category_name)
            .bind(item.price)
            .bind(&item.image)
            .bind(item.stock_quantity)
            .bind(now)
            .bind(&item.external_id)
            .execute(&mut *conn)
            .await?;
            Ok(false)
        }
        None => {
            sqlx::query(
                "INSERT INTO catalog_item (id, external_id, name, description, category_id, \
                 category_name, price, image, stock_quantity, is_active, is_present, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 1, ?)",
            )
            .bind(snowflake_id())
            .bind(&item.external_id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(&item.category_id)
            .bind(&item.category_name)
            .bind(item.price)
            .bind(&item.image)
            .bind(item.stock_quantity.unwrap_or(0))
            .bind(now)
            .execute(&mut *conn)
            .await?;
            Ok(true)
        }
    }
}

/// Advance the heartbeat of every observed row in one bulk statement per
/// chunk, whether or not any field changed.
pub async fn touch_observed(
    conn: &mut SqliteConnection,
    external_ids: &[String],
    now: i64,
) -> RepoResult<u64> {
    let mut touched = 0u64;
    for chunk in external_ids.chunks(IN_CLAUSE_CHUNK) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "UPDATE catalog_item SET updated_at = ? WHERE external_id IN ({placeholders})"
        );
        let mut query = sqlx::query(&sql).bind(now);
        for id in chunk {
            query = query.bind(id);
        }
        touched += query.execute(&mut *conn).await?.rows_affected();
    }
    Ok(touched)
}

/// Soft-delete rows whose heartbeat predates the cutoff. Only flips
/// `is_present`; the storefront `is_active` flag is untouched.
pub async fn sweep_stale(conn: &mut SqliteConnection, cutoff: i64) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE catalog_item SET is_present = 0 WHERE updated_at < ? AND is_present = 1",
    )
    .bind(cutoff)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn find_by_external_id(
    pool: &SqlitePool,
    external_id: &str,
) -> RepoResult<Option<CatalogItem>> {
    let row = sqlx::query_as::<_, CatalogItem>("SELECT * FROM catalog_item WHERE external_id = ?")
        .bind(external_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Storefront listing: present and active rows only.
pub async fn list_storefront(pool: &SqlitePool) -> RepoResult<Vec<CatalogItem>> {
    let rows = sqlx::query_as::<_, CatalogItem>(
        "SELECT * FROM catalog_item WHERE is_present = 1 AND is_active = 1 \
         ORDER BY category_name, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Toggle storefront visibility. Independent of the `is_present` flag.
pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<CatalogItem> {
    let rows = sqlx::query("UPDATE catalog_item SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Catalog item {id} not found")));
    }
    let row = sqlx::query_as::<_, CatalogItem>("SELECT * FROM catalog_item WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(row)
}
