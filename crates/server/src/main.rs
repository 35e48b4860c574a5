use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use animedex_core::{
    load_config, validate_config, EpisodeCatalog, FavoritesStore, SettingsStore,
    SqliteEpisodeCatalog, SqliteFavoritesStore, SqliteSettingsStore, SqliteTrendingStore,
    SqliteUserStore, TrendingStore, UserStore,
};
use animedex_server::api::create_router;
use animedex_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("animedex {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("ANIMEDEX_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // All stores share one database file
    let db_path = &config.database.path;

    let catalog: Arc<dyn EpisodeCatalog> = Arc::new(
        SqliteEpisodeCatalog::new(db_path).context("Failed to create episode catalog")?,
    );
    let trending: Arc<dyn TrendingStore> = Arc::new(
        SqliteTrendingStore::new(db_path).context("Failed to create trending store")?,
    );
    let favorites: Arc<dyn FavoritesStore> = Arc::new(
        SqliteFavoritesStore::new(db_path).context("Failed to create favorites store")?,
    );
    let settings: Arc<dyn SettingsStore> = Arc::new(
        SqliteSettingsStore::new(db_path).context("Failed to create settings store")?,
    );
    let users: Arc<dyn UserStore> =
        Arc::new(SqliteUserStore::new(db_path).context("Failed to create user store")?);
    info!("Catalog stores initialized");

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        catalog,
        trending,
        favorites,
        settings,
        users,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
