//! Todo service entry point.
//!
//! Loads `.env`, configuration and logging, opens the SQLite store, then
//! serves HTTP until Ctrl-C.

use log::{error, info};
use std::error::Error;
use todo_core::db::open_db;
use todo_core::init_logging;
use todo_server::{app, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    let log_dir = config.log_dir.to_string_lossy().into_owned();
    init_logging(&config.log_level, &log_dir)?;
    info!(
        "event=config_loaded module=server status=ok host={} port={} database_file={} config_file={}",
        config.host,
        config.port,
        config.database_file.display(),
        config
            .source_file
            .as_deref()
            .map_or_else(|| "none".to_string(), |path| path.display().to_string())
    );

    let conn = open_db(&config.database_file)?;
    let router = app(AppState::new(conn));

    let address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        "event=server_start module=server status=ok address={address} version={}",
        todo_core::core_version()
    );

    if let Err(err) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("event=server_stop module=server status=error error={err}");
        return Err(err.into());
    }

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=server status=error error={err}");
    }
}
