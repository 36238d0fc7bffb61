// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tavola serve` command implementation.
//!
//! Wires the full pipeline: SQLite storage with embedded migrations, the
//! candidate index and resolver, the SMTP notifier, and the fixed-rate
//! fulfillment worker. Runs until SIGINT/SIGTERM.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use tavola_config::model::TavolaConfig;
use tavola_core::{SearchIndex, StorageAdapter, TavolaError};
use tavola_notify::SmtpNotifier;
use tavola_search::{SearchResolver, SqliteSearchIndex};
use tavola_storage::SqliteStorage;
use tavola_worker::{FulfillmentWorker, WorkerRunner};

/// Runs the `tavola serve` command.
pub async fn run_serve(config: TavolaConfig) -> Result<(), TavolaError> {
    init_tracing(&config.service.log_level);

    info!("starting tavola serve");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let index = Arc::new(SqliteSearchIndex::new(storage.clone()));
    let indexed = index.rebuild().await?;
    info!(indexed, "candidate index ready");

    let resolver = Arc::new(SearchResolver::new(
        index,
        storage.clone(),
        &config.search,
    ));
    let notifier = Arc::new(SmtpNotifier::new(&config.smtp)?);

    let worker = FulfillmentWorker::new(
        storage.clone(),
        resolver,
        notifier,
        config.worker.clone(),
    );
    let runner = WorkerRunner::new(worker, config.worker.interval_secs);

    let cancel = install_signal_handler();
    runner.run(cancel).await?;

    storage.close().await?;
    info!("tavola serve stopped");
    Ok(())
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::error!(error = %e, "failed to install SIGTERM handler");
                    let _ = ctrl_c.await;
                    token_clone.cancel();
                    return;
                }
            };

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
    });

    token
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tavola={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
