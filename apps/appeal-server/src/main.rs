use anyhow::Context;
use appeal_server::{build_router, config::ServerConfig, AppState};
use appeal_store::FileStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "appeal_server=debug,appeal_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let config = ServerConfig::load()?;
    let store = FileStore::open(&config.storage_dir)
        .await
        .with_context(|| format!("Failed to open {}", config.storage_dir.display()))?;

    let key_hint: String = config.api_key.chars().take(4).collect();
    tracing::info!("Appeal server starting...");
    tracing::info!("Appeals folder: {}", store.dir().display());
    tracing::info!("API key: {}...", key_hint);
    tracing::info!("Routes under '{}':", config.base_path());
    tracing::info!("  POST /appeal      - submit an appeal (API key)");
    tracing::info!("  GET  /appeals     - list appeal ids (API key)");
    tracing::info!("  GET  /appeal/{{id}} - fetch one appeal (API key)");
    tracing::info!("  GET  /health      - health check");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let app = build_router(AppState::new(config, Arc::new(store)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Appeal server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Appeal server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
