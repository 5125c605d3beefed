//! POS Integration
//!
//! The POS owns catalog and order truth. This module defines the client
//! seam the reconciler and ticket manager depend on, plus the HTTP
//! implementation. Components receive the client as `Arc<dyn PosClient>`
//! so tests can substitute an in-process double.

pub mod http;

pub use http::PosHttpClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{OrderLineItem, OrderSnapshot};

/// POS call failures.
///
/// `Unavailable` covers transport problems (connect, timeout, aborted
/// request); `Rejected` is a business-level refusal from a reachable POS.
#[derive(Debug, thiserror::Error)]
pub enum PosError {
    #[error("POS unreachable: {0}")]
    Unavailable(String),

    #[error("POS rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("POS order not found: {0}")]
    OrderNotFound(String),
}

/// Remote catalog item as returned by the POS list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCatalogItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: Option<String>,
    /// Minor units of `currency`
    pub price: i64,
    pub currency: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
}

/// Remote category as returned by the POS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCategory {
    pub id: String,
    pub name: String,
}

/// Operations consumed from the POS.
#[async_trait]
pub trait PosClient: Send + Sync {
    /// Full catalog snapshot (the implementation drains remote paging).
    async fn list_catalog_items(&self) -> Result<Vec<RemoteCatalogItem>, PosError>;

    async fn list_categories(&self) -> Result<Vec<RemoteCategory>, PosError>;

    /// Fetch an order; a missing order is `PosError::OrderNotFound`.
    async fn get_order(&self, order_id: &str) -> Result<OrderSnapshot, PosError>;

    async fn create_order(
        &self,
        room_number: &str,
        guest_name: &str,
    ) -> Result<OrderSnapshot, PosError>;

    async fn append_line_items(
        &self,
        order_id: &str,
        items: &[OrderLineItem],
    ) -> Result<OrderSnapshot, PosError>;
}
