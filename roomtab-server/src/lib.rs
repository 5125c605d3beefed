//! RoomTab Server - hotel in-room ordering backend
//!
//! # Architecture overview
//!
//! Guests order from a chat-app mini-app, staff fulfill on a kitchen
//! display, and this backend keeps a local mirror of the POS catalog and a
//! per-room ticket linked to a POS order. The POS owns catalog and order
//! truth; the local store is a cache with explicit staleness semantics.
//!
//! # Module structure
//!
//! ```text
//! roomtab-server/src/
//! ├── core/          # config, state, HTTP server
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── pos/           # POS client trait + HTTP implementation
//! ├── catalog/       # catalog mirror reconciler + periodic worker
//! ├── tickets/       # room ticket lifecycle manager
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod pos;
pub mod tickets;
pub mod utils;

// Re-export public types
pub use catalog::{CatalogReconciler, SyncError, SyncWorker};
pub use core::{AppState, Config, Server};
pub use db::{DbService, MIGRATOR};
pub use pos::{PosClient, PosError, PosHttpClient};
pub use tickets::{TicketError, TicketManager};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____                       ______      __
   / __ \____  ____  ____ ___ /_  __/___ _/ /_
  / /_/ / __ \/ __ \/ __ `__ \ / / / __ `/ __ \
 / _, _/ /_/ / /_/ / / / / / // / / /_/ / /_/ /
/_/ |_|\____/\____/_/ /_/ /_//_/  \__,_/_.___/
    "#
    );
}
