//! Room Tickets
//!
//! Per-room open tabs linking a local row to a POS order.

mod manager;

pub use manager::{TicketError, TicketManager};
