//! Catalog Mirror Model

use serde::{Deserialize, Serialize};

/// Locally mirrored catalog item.
///
/// The POS owns the canonical catalog; this row is a cache with explicit
/// staleness semantics. `is_present` tracks whether the item was observed
/// in the most recent completed reconciliation pass and is independent of
/// `is_active`, which only controls storefront visibility. `updated_at` is
/// a heartbeat touched on every pass in which the item was observed,
/// whether or not its fields changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CatalogItem {
    pub id: i64,
    /// POS catalog identifier (unique)
    pub external_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: String,
    /// Price in minor units of the hotel's home currency
    pub price: i64,
    /// Opaque remote image reference, resolved lazily by a separate process
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock_quantity: i64,
    pub is_active: bool,
    pub is_present: bool,
    pub updated_at: i64,
}

/// Storefront visibility toggle payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItemActiveUpdate {
    pub is_active: bool,
}
