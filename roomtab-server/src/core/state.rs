use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::CatalogReconciler;
use crate::core::Config;
use crate::db::DbService;
use crate::pos::{PosClient, PosHttpClient};
use crate::tickets::TicketManager;
use crate::utils::AppError;

/// Shared application state, holding explicit handles to every service.
///
/// No process-wide singletons: the reconciler and ticket manager receive
/// their store pool and POS client at construction, and `AppState` is the
/// only composition point. Arc-backed fields make cloning cheap.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// POS client (trait object so tests can substitute a double)
    pub pos: Arc<dyn PosClient>,
    /// Room ticket lifecycle manager
    pub tickets: Arc<TicketManager>,
    /// Catalog mirror reconciler
    pub reconciler: Arc<CatalogReconciler>,
}

impl AppState {
    /// Wire up state from parts. Used directly by tests.
    pub fn new(config: Config, pool: SqlitePool, pos: Arc<dyn PosClient>) -> Self {
        let tickets = Arc::new(TicketManager::new(pool.clone(), pos.clone()));
        let reconciler = Arc::new(CatalogReconciler::new(pool.clone(), pos.clone(), &config));
        Self {
            config,
            pool,
            pos,
            tickets,
            reconciler,
        }
    }

    /// Initialize production state: work directory, database, POS client.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir()
            .map_err(|e| AppError::Internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.db_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        let pos: Arc<dyn PosClient> = Arc::new(PosHttpClient::new(
            config.pos_base_url.clone(),
            config.pos_access_token.clone(),
            Duration::from_millis(config.pos_timeout_ms),
        )?);

        Ok(Self::new(config.clone(), db.pool, pos))
    }
}
