// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over the seafood scorer
// Usage: cargo run --features api --bin api_server

use seafood_scorer::config::ServerConfig;
use seafood_scorer::{create_router, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "seafood_scorer=info,tower_http=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    let config = ServerConfig::from_env()?;

    tracing::info!("Configuration:");
    tracing::info!(
        "  DATA_DIR: {}",
        config
            .data_dir
            .as_ref()
            .map_or_else(|| "(bundled)".to_string(), |d| d.display().to_string())
    );
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  STRICT_CATALOG: {}", config.strict_catalog);
    tracing::info!("  CACHE_TTL: {:?}", config.cache_ttl);

    // Initialize application state (loads data, builds indexes)
    let state = AppState::from_config(&config)?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
