//! Catalog Mirror
//!
//! Keeps the local catalog mirror synchronized with the POS catalog via
//! pull-based mark-and-sweep reconciliation.

mod reconciler;
mod worker;

pub use reconciler::{CatalogReconciler, SyncError};
pub use worker::SyncWorker;
