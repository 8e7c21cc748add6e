//! Extracurricular activities directory for Mergington High School.
//!
//! Students can list the activities on offer, sign up for one, and be removed from one. The
//! service is laid out as ports and adapters:
//!
//! - [`domain`] holds the `Activity` record and the seed catalog.
//! - [`ports`] declares the activity store the rest of the crate depends on.
//! - [`adapters`] implements that store in memory and on SQLite.
//! - [`commands`] implements each use case as a `tower::Service` over an injected store.
//! - [`http`] exposes the commands as JSON endpoints.

use std::sync::Arc;

use anyhow::Context;
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower::ServiceExt;
use tracing::{error, info};

pub mod adapters;
pub mod commands;
pub mod config;
pub mod domain;
pub mod http;
pub mod ports;

use adapters::store::{memory::MemoryStore, sqlite::SqliteStore};
use commands::{seed::SeedRequest, DomainLogic};
use config::{Config, StoreBackend};
use domain::catalog::initial_activities;
use ports::activity_store::ActivityStorePort;

/// Build the configured store and serve until a shutdown signal arrives
pub async fn run(config: Config) -> anyhow::Result<()> {
    match config.store {
        StoreBackend::Memory => {
            info!("Using in-memory activity store");
            serve(Arc::new(MemoryStore::default()), &config).await
        }
        StoreBackend::Sqlite => {
            let store = SqliteStore::connect(&config.database_url, config.database_max_connections)
                .await
                .with_context(|| format!("failed to open {}", config.database_url))?;
            let store = Arc::new(store);

            let res = serve(store.clone(), &config).await;
            store.close().await;
            res
        }
    }
}

async fn serve<S>(store: Arc<S>, config: &Config) -> anyhow::Result<()>
where
    S: ActivityStorePort + 'static,
{
    match store.ping().await {
        Ok(()) => info!("Activity store is reachable"),
        Err(err) => error!("Activity store ping failed: {err}"),
    }

    let domain = DomainLogic::new(store, config.capacity);
    domain
        .clone()
        .oneshot(SeedRequest {
            activities: initial_activities(),
            mode: config.seed_mode,
        })
        .await
        .context("failed to seed activity catalog")?;

    let app = http::router(domain, &config.static_dir);

    let address = config.address()?;
    info!("Binding to {address}");

    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!("Failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!("Failed to install signal handler: {err}");
                std::future::pending::<()>().await
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
