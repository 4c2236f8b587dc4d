mod api;
mod config;
mod game;
mod track;
mod util;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::router::build_router;
use crate::api::state::AppState;
use crate::config::{GameConfig, ServerConfig};
use crate::track::source::StateSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Robo Liga server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let server_config = ServerConfig::load_or_default();
    if let Err(e) = server_config.validate() {
        error!("Invalid server configuration: {}", e);
        anyhow::bail!(e);
    }

    let game_config = Arc::new(GameConfig::from_file(&server_config.game_config_path)?);
    info!(
        "Configuration loaded: {}:{}, max_games={}, {} teams in roster",
        server_config.bind_address,
        server_config.port,
        server_config.max_games,
        game_config.robots.len()
    );

    // Shared state: one snapshot source feeding every session loop
    let source = StateSource::new();
    let state = Arc::new(AppState::new(
        game_config,
        source,
        server_config.max_games,
    ));

    let app = build_router(state);
    let addr = std::net::SocketAddr::new(server_config.bind_address, server_config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server ready on http://{}", addr);

    // Run with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                error!("Failed to install Ctrl+C handler");
            }
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
