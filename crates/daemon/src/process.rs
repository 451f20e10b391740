//! Service lifecycle: wire the ledger, store and watcher together, run
//! the initial download pass, then serve the control surface until
//! ctrl-c.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use sync::{RemoteStore, SyncLedger};

use crate::config::Config;
use crate::database::Database;
use crate::http_server;
use crate::ops;
use crate::state::ServiceState;
use crate::watcher;

pub async fn start_service(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config).await?;

    // bring the local folder up to date before accepting requests
    match ops::run_download_pass(&state).await {
        Ok(count) => info!(downloaded = count, "initial download pass complete"),
        Err(err) => warn!(error = %err, "initial download pass failed, continuing"),
    }

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "control surface listening");

    axum::serve(listener, http_server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("service stopped");
    Ok(())
}

async fn build_state(config: &Config) -> anyhow::Result<ServiceState> {
    std::fs::create_dir_all(&config.sync_folder)
        .with_context(|| format!("creating sync folder {}", config.sync_folder.display()))?;

    let ledger: Arc<dyn SyncLedger> = match &config.ledger_db {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Arc::new(Database::new(path).await?)
        }
        None => Arc::new(Database::in_memory().await?),
    };

    let store: Arc<dyn RemoteStore> = Arc::new(store::Storage::from_config(&config.store)?);

    let (watcher, mut events) = watcher::spawn(config.sync_folder.clone())?;
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            info!(path = %event.path.display(), kind = ?event.kind, "local change");
        }
    });

    Ok(ServiceState::new(config.clone(), store, ledger, watcher))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
