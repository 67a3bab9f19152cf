//! Prompt Registry HTTP server
//!
//! REST API for creating and reading versioned prompts, backed by SQLite.

use prompt_registry::{PromptStore, SqliteStore};
use prompt_registry_server::{AppState, config::ServerConfig, create_router, error::Result};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "prompt_registry=debug,prompt_registry_server=debug,tower_http=debug".to_string()
        }))
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        host = %config.host,
        port = config.port,
        database = %config.database_url,
        "starting prompt registry server"
    );

    ensure_data_dir(&config.database_url)?;

    let store = Arc::new(SqliteStore::new(&config.database_url).await?);

    let state = AppState::new(store.clone());
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| {
            prompt_registry_server::error::ApiError::Config("Invalid HOST/PORT".to_string())
        })?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("server stopped gracefully");

    Ok(())
}

/// Create the parent directory of a `sqlite:` file path if it is missing.
fn ensure_data_dir(database_url: &str) -> Result<()> {
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        if let Some(dir) = Path::new(path).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
    }
    Ok(())
}

/// Resolve on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c"),
        _ = terminate => info!("received SIGTERM"),
    }
}
