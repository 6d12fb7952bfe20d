pub mod aid;
pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod protocol;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Start the registry service: tracing, database, HTTP API. Runs until
/// ctrl-c.
pub async fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = Arc::new(
        core_state::CoreState::new().map_err(|e| format!("Cannot open database: {e}"))?,
    );

    let mut server = api::server::start_api_server(core, config::bind_addr()).await?;
    tracing::info!(addr = %server.addr, "ready");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Cannot listen for shutdown signal: {e}"))?;
    server.shutdown();
    Ok(())
}
