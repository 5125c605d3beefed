//! Data models
//!
//! Shared between roomtab-server and frontends (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All timestamps are Unix millis (`i64`).

pub mod catalog;
pub mod order;
pub mod sync;
pub mod ticket;

// Re-exports
pub use catalog::*;
pub use order::*;
pub use sync::*;
pub use ticket::*;
