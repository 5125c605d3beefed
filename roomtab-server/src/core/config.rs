use std::path::PathBuf;

/// Server configuration.
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/roomtab | work directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | POS_BASE_URL | http://localhost:8900 | POS API base URL |
/// | POS_ACCESS_TOKEN | (none) | bearer token for the POS API |
/// | POS_TIMEOUT_MS | 5000 | per-request timeout for POS calls |
/// | HOME_CURRENCY | EUR | hotel's home currency (price normalization) |
/// | CATALOG_SYNC_INTERVAL_SECS | 300 | reconciliation interval |
/// | CATALOG_SWEEP_GRACE_SECS | 540 | mark-and-sweep grace window |
///
/// The sweep grace window must exceed the wall-clock duration of one full
/// reconciliation pass; tune it to observed pass latency, never below it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory, stores the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,

    // === POS integration ===
    /// Base URL of the POS API
    pub pos_base_url: String,
    /// Optional bearer token for the POS API
    pub pos_access_token: Option<String>,
    /// Per-request timeout for POS calls (milliseconds)
    pub pos_timeout_ms: u64,

    // === Catalog mirror ===
    /// Hotel's home currency code
    pub home_currency: String,
    /// Interval between reconciliation passes (seconds)
    pub catalog_sync_interval_secs: u64,
    /// Staleness grace window for the soft-delete sweep (seconds)
    pub catalog_sweep_grace_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/roomtab".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            pos_base_url: std::env::var("POS_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8900".into()),
            pos_access_token: std::env::var("POS_ACCESS_TOKEN").ok(),
            pos_timeout_ms: std::env::var("POS_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            home_currency: std::env::var("HOME_CURRENCY").unwrap_or_else(|_| "EUR".into()),
            catalog_sync_interval_secs: std::env::var("CATALOG_SYNC_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            catalog_sweep_grace_secs: std::env::var("CATALOG_SWEEP_GRACE_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(540),
        }
    }

    /// Override selected values. Mostly for tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Path of the SQLite database file
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("roomtab.db")
    }

    /// Make sure the work directory exists
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_work_dir_and_port() {
        let config = Config::with_overrides("/tmp/roomtab-test", 8080);
        assert_eq!(config.work_dir, "/tmp/roomtab-test");
        assert_eq!(config.http_port, 8080);
        assert!(config.db_path().ends_with("roomtab.db"));
    }
}
