//! Fish Ledger - server entry point

use std::{net::SocketAddr, sync::Arc, time::Duration};

use fish_ledger_backend::{
    config::Config,
    create_app,
    store::{LedgerStore, MemoryLedgerStore, PgLedgerStore},
    AppState,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fish_ledger_server=debug,fish_ledger_backend=debug,tower_http=debug,sqlx=warn"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;

    tracing::info!("Starting Fish Ledger Server");
    tracing::info!("Environment: {}", config.environment);

    let store = connect_store(&config).await?;
    let addr: SocketAddr = config.bind_address().parse()?;

    // Create application state
    let state = AppState::new(store, config);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open the configured storage engine, applying migrations when enabled
async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn LedgerStore>> {
    if config.database.is_memory() {
        tracing::warn!("Using in-memory store; data will not survive a restart");
        return Ok(Arc::new(MemoryLedgerStore::new()));
    }

    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    let store = PgLedgerStore::new(db_pool);
    if config.database.run_migrations {
        tracing::info!("Running database migrations...");
        store.migrate().await?;
        tracing::info!("Migrations completed");
    }

    Ok(Arc::new(store))
}
