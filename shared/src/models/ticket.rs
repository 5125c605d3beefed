//! Room Ticket Model

use serde::{Deserialize, Serialize};

use super::order::OrderSnapshot;

/// Ticket lifecycle status.
///
/// `Completed` and `Canceled` rows are retained for audit; they are only
/// removed by the create-time cleanup of invalid rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type), sqlx(rename_all = "UPPERCASE"))]
pub enum TicketStatus {
    Open,
    Completed,
    Canceled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "OPEN",
            TicketStatus::Completed => "COMPLETED",
            TicketStatus::Canceled => "CANCELED",
        }
    }
}

/// Per-room open tab linking a local row to a POS order.
///
/// Invariants:
/// - at most one `Open` ticket per `room_number` (partial unique index)
/// - every `Open` ticket has a non-empty `external_order_id`; a row that
///   loses this is healed to `Canceled` on the next read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RoomTicket {
    /// Globally unique token (UUID)
    pub id: String,
    pub room_number: String,
    #[serde(default)]
    pub guest_name: String,
    pub status: TicketStatus,
    /// Nullable only transiently during creation
    pub external_order_id: Option<String>,
    /// Last known POS-side order state, as reported by the POS
    pub remote_state: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl RoomTicket {
    /// Build a fresh `Open` ticket linked to a POS order.
    pub fn open(room_number: &str, guest_name: &str, external_order_id: &str) -> Self {
        let now = crate::util::now_millis();
        Self {
            id: crate::util::ticket_token(),
            room_number: room_number.to_string(),
            guest_name: guest_name.to_string(),
            status: TicketStatus::Open,
            external_order_id: Some(external_order_id.to_string()),
            remote_state: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Merged ticket view returned to callers: the local row plus the latest
/// POS order snapshot. The remote snapshot is authoritative for line items
/// and totals; the local row is authoritative for room linkage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: RoomTicket,
    pub remote: OrderSnapshot,
}
