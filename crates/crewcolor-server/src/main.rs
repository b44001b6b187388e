//! `crewcolor` server entry point.
//!
//! Loads configuration, opens the storage backend, then starts the Axum HTTP
//! server with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crewcolor_server::config::{ServerConfig, StorageBackendType};
use crewcolor_server::routes::build_router;
use crewcolor_server::state::AppState;
use crewcolor_storage::{MemoryBackend, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing credentials or store URL stop the process before anything binds.
    let config = ServerConfig::from_env().context("invalid configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        storage = ?config.storage_backend,
        gate_submit = config.gate_submit,
        img_dir = %config.img_dir.display(),
        "crewcolor starting"
    );

    let storage = open_storage(&config).await?;
    let state = AppState::new(&config, storage);
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "crewcolor server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("crewcolor server stopped");
    Ok(())
}

/// Open the configured storage backend.
async fn open_storage(config: &ServerConfig) -> anyhow::Result<Arc<dyn StorageBackend>> {
    let storage: Arc<dyn StorageBackend> = match &config.storage_backend {
        StorageBackendType::Memory => {
            info!("using in-memory storage (data will not persist)");
            Arc::new(MemoryBackend::new())
        }
        #[cfg(feature = "redis-backend")]
        StorageBackendType::Redis { url } => {
            let backend = crewcolor_storage::RedisBackend::connect(url)
                .await
                .context("failed to connect to redis")?;
            info!(addr = %backend.addr(), "using redis storage");
            Arc::new(backend)
        }
        #[cfg(not(feature = "redis-backend"))]
        StorageBackendType::Redis { .. } => {
            anyhow::bail!("redis storage requested but feature 'redis-backend' is not enabled");
        }
    };

    Ok(storage)
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
