use live_cantos::catalog::Catalog;
use live_cantos::config::{ServerConfig, USAGE};
use live_cantos::routes::build_router;
use live_cantos::session::SessionActor;
use live_cantos::store::{MemoryStore, SongStore, SqliteStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match ServerConfig::from_env_and_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // 1. Store:
    let store: Arc<dyn SongStore> = match &config.db_path {
        Some(path) => {
            tracing::info!("Using SQLite store at {}", path.display());
            Arc::new(SqliteStore::open(path)?)
        }
        None => {
            tracing::warn!("No database configured, songs are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    // 2. Catalog + search index:
    let catalog = Catalog::new(store.clone());
    if let Err(e) = catalog.rebuild_index().await {
        tracing::error!("Initial search index build failed: {:#}", e);
    }

    // 3. Live session:
    let session = SessionActor::spawn(store);

    // 4. HTTP Router:
    let app = build_router(catalog, session);

    // 5. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
