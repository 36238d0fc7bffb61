// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fulfillment worker: claims queued requests and drives each through
//! search, hydration, and notification.
//!
//! Messages are processed sequentially and in isolation: one bad message
//! never aborts the batch. Failure classification decides the queue action:
//! permanent failures are dead-lettered, transient ones released for
//! redelivery, and the notification marker keeps redeliveries idempotent.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use tavola_config::model::WorkerConfig;
use tavola_core::{FulfillmentRequest, Notifier, QueueEntry, StorageAdapter, TavolaError};
use tavola_search::SearchResolver;

/// Counters for one worker invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub claimed: usize,
    pub completed: usize,
    pub released: usize,
    pub dead_lettered: usize,
}

pub struct FulfillmentWorker {
    storage: Arc<dyn StorageAdapter>,
    resolver: Arc<SearchResolver>,
    notifier: Arc<dyn Notifier>,
    config: WorkerConfig,
}

enum Disposition {
    Completed,
    Released,
    DeadLettered,
}

impl FulfillmentWorker {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        resolver: Arc<SearchResolver>,
        notifier: Arc<dyn Notifier>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            storage,
            resolver,
            notifier,
            config,
        }
    }

    /// Claim and process one batch.
    ///
    /// Returns an error only when the queue itself is unreachable;
    /// per-message failures are absorbed into the outcome counters.
    pub async fn run_once(&self) -> Result<BatchOutcome, TavolaError> {
        let entries = self
            .storage
            .poll(
                &self.config.queue_name,
                self.config.batch_size,
                self.config.visibility_timeout_secs,
            )
            .await?;

        let mut outcome = BatchOutcome {
            claimed: entries.len(),
            ..BatchOutcome::default()
        };
        if entries.is_empty() {
            debug!(queue = %self.config.queue_name, "queue empty");
            return Ok(outcome);
        }

        info!(claimed = entries.len(), queue = %self.config.queue_name, "processing batch");
        for entry in entries {
            let entry_id = entry.id;
            match self.process_entry(entry).await {
                Ok(Disposition::Completed) => outcome.completed += 1,
                Ok(Disposition::Released) => outcome.released += 1,
                Ok(Disposition::DeadLettered) => outcome.dead_lettered += 1,
                Err(e) => {
                    // Queue bookkeeping itself failed; the visibility timeout
                    // will resurface the message.
                    error!(entry_id, error = %e, "failed to disposition message");
                }
            }
        }
        Ok(outcome)
    }

    async fn process_entry(&self, entry: QueueEntry) -> Result<Disposition, TavolaError> {
        if entry.deliveries > self.config.max_deliveries {
            warn!(
                entry_id = entry.id,
                deliveries = entry.deliveries,
                "delivery limit exceeded, dead-lettering"
            );
            self.storage
                .dead_letter(&entry, "delivery limit exceeded")
                .await?;
            return Ok(Disposition::DeadLettered);
        }

        let request: FulfillmentRequest = match serde_json::from_str(&entry.payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(entry_id = entry.id, error = %e, "malformed payload, dead-lettering");
                self.storage
                    .dead_letter(&entry, "malformed payload")
                    .await?;
                return Ok(Disposition::DeadLettered);
            }
        };

        if self.storage.was_notified(&request.request_id).await? {
            debug!(request_id = %request.request_id, "duplicate delivery, already notified");
            self.storage.ack(entry.id).await?;
            return Ok(Disposition::Completed);
        }

        match self.fulfill(&request).await {
            Ok(()) => {
                if !self
                    .storage
                    .mark_notified(&request.request_id, &request.contact_address)
                    .await?
                {
                    debug!(request_id = %request.request_id, "marker already present");
                }
                self.storage.ack(entry.id).await?;
                Ok(Disposition::Completed)
            }
            Err(e) if e.is_permanent() => {
                warn!(request_id = %request.request_id, error = %e, "permanent failure, dead-lettering");
                self.storage.dead_letter(&entry, &e.to_string()).await?;
                Ok(Disposition::DeadLettered)
            }
            Err(e) => {
                info!(request_id = %request.request_id, error = %e, "transient failure, releasing");
                self.storage.release(entry.id).await?;
                Ok(Disposition::Released)
            }
        }
    }

    /// Search, hydrate, and notify for a single request.
    async fn fulfill(&self, request: &FulfillmentRequest) -> Result<(), TavolaError> {
        let candidate_ids = self
            .resolver
            .resolve(request.cuisine, request.area, self.config.sample_size)
            .await?;

        if candidate_ids.is_empty() {
            // Confirmed by the primary store: this combination has no
            // matches, and retrying cannot change that.
            info!(request_id = %request.request_id, cuisine = %request.cuisine,
                  area = %request.area, "no matches, sending terminal notice");
            return self.notifier.notify_no_matches(request).await;
        }

        let records = self.storage.get_restaurants(&candidate_ids).await?;
        if records.is_empty() {
            // All candidate ids were stale (index lag). The store may catch
            // up, so leave the message for redelivery.
            return Err(TavolaError::Search {
                message: "all candidate ids were stale".to_string(),
                source: None,
            });
        }

        self.notifier.notify(request, &records).await
    }
}
