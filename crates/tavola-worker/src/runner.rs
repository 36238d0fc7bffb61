// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-rate scheduling for the fulfillment worker.
//!
//! The runner fires at a fixed rate rather than a fixed delay: slow batches
//! do not push subsequent ticks later. The visibility timeout protects
//! messages still being processed if ticks overlap.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use tavola_core::TavolaError;

use crate::worker::FulfillmentWorker;

pub struct WorkerRunner {
    worker: FulfillmentWorker,
    interval: Duration,
}

impl WorkerRunner {
    pub fn new(worker: FulfillmentWorker, interval_secs: u64) -> Self {
        Self {
            worker,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Run until the cancellation token fires.
    ///
    /// A failed batch is logged and the runner keeps ticking; only
    /// cancellation stops the loop.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), TavolaError> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        info!(interval_secs = self.interval.as_secs(), "worker runner started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.worker.run_once().await {
                        Ok(outcome) if outcome.claimed > 0 => {
                            info!(
                                claimed = outcome.claimed,
                                completed = outcome.completed,
                                released = outcome.released,
                                dead_lettered = outcome.dead_lettered,
                                "batch processed"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!(error = %e, "batch failed");
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping worker runner");
                    break;
                }
            }
        }
        Ok(())
    }
}
