use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mythward_core::{
    load_config, validate_config, MetadataStore, MythApiClient, Recordings, SqliteMetadataStore,
    StorageGroups, UpstreamClient, VideoLibrary,
};

use mythward_server::api::create_router;
use mythward_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
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

    info!("Mythward {}", VERSION);

    // Determine config path
    let config_path = std::env::var("MYTHWARD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Upstream backend: {}", config.upstream.base_url);
    info!("Database path: {:?}", config.database.path);

    // Create the upstream client
    let upstream: Arc<dyn UpstreamClient> = Arc::new(MythApiClient::new(&config.upstream));

    // Create the SQLite metadata store
    let store: Arc<dyn MetadataStore> = Arc::new(
        SqliteMetadataStore::new(&config.database.path)
            .context("Failed to create metadata store")?,
    );
    info!("Metadata store initialized");

    // Storage group resolver, seeded with configured overrides
    let storage = Arc::new(StorageGroups::new(
        Arc::clone(&upstream),
        config.library.storage_groups.clone(),
    ));

    let library = Arc::new(VideoLibrary::new(
        Arc::clone(&upstream),
        store,
        Arc::clone(&storage),
        config.library.categories.clone(),
    ));

    let recordings = Arc::new(Recordings::new(Arc::clone(&upstream)));

    // Seed the scheduled-recordings cache; failures are logged and the
    // cache fills in on later schedule calls.
    recordings.load_scheduled().await;

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        library,
        recordings,
        storage,
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

    info!("Server shutting down...");

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
