//! Shared types for the RoomTab platform
//!
//! Common types used by the server and its clients (guest mini-app,
//! kitchen display): ticket views, line-item inputs and normalization,
//! catalog mirror rows, sync reports, and utility functions.

pub mod item;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use item::{ItemInput, LineItem, LineItemTarget, NormalizeError, normalize_item, normalize_items};
pub use models::{CatalogItem, OrderLineItem, OrderSnapshot, RoomTicket, TicketStatus, TicketView};
