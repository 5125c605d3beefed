use roomtab_server::{AppState, Config, Server, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    print_banner();
    tracing::info!("RoomTab server starting...");

    let config = Config::from_env();
    let state = AppState::initialize(&config).await.map_err(|e| {
        tracing::error!("Initialization failed: {e}");
        anyhow::anyhow!("{e}")
    })?;

    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(anyhow::anyhow!("{e}"));
    }

    Ok(())
}
