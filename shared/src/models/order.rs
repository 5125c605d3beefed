//! Remote Order Snapshot
//!
//! Wire view of a POS order as consumed by this platform. The POS owns the
//! canonical order; we never persist line items locally.

use serde::{Deserialize, Serialize};

use crate::item::{LineItem, LineItemTarget};

/// POS order snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: String,
    /// POS-owned state vocabulary ("open", "completed", "canceled", ...)
    pub state: String,
    #[serde(default)]
    pub line_items: Vec<OrderLineItem>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl OrderSnapshot {
    pub fn is_open(&self) -> bool {
        self.state.eq_ignore_ascii_case("open")
    }
}

/// A single line on a POS order.
///
/// Either references a catalog item by its POS id, or carries an ad-hoc
/// name/price pair. Prices are minor units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    pub quantity: i64,
    #[serde(default)]
    pub note: String,
}

impl From<LineItem> for OrderLineItem {
    fn from(item: LineItem) -> Self {
        match item.target {
            LineItemTarget::Catalog { square_item_id } => Self {
                square_item_id: Some(square_item_id),
                name: None,
                price: None,
                quantity: item.quantity,
                note: item.note,
            },
            LineItemTarget::AdHoc { name, price } => Self {
                square_item_id: None,
                name: Some(name),
                price: Some(price),
                quantity: item.quantity,
                note: item.note,
            },
        }
    }
}
