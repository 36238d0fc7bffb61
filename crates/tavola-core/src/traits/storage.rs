// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the primary store, preference store, queue,
//! dead-letter sink, and idempotency markers.

use async_trait::async_trait;

use crate::error::TavolaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Cuisine, DeadLetter, EntityRecord, PreferenceRecord, QueueEntry, RequestId, ServiceArea,
    UserKey,
};

/// Aggregate queue statistics, surfaced by `tavola status`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub dead_lettered: i64,
    pub notified: i64,
}

/// Adapter for the persistence backend.
///
/// Everything durable lives behind this trait: the restaurant primary store
/// (read-only for the fulfillment path), the per-user preference store, the
/// at-least-once request queue, the dead-letter sink, and the "already
/// notified" markers the worker uses for redelivery idempotency.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, PRAGMAs).
    async fn initialize(&self) -> Result<(), TavolaError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), TavolaError>;

    // --- Request queue ---

    /// Enqueue a serialized request payload. Returns the queue entry id.
    async fn enqueue(&self, queue_name: &str, payload: &str) -> Result<i64, TavolaError>;

    /// Claim up to `max_messages` entries, hiding each for
    /// `visibility_timeout_secs`. Entries whose previous lock expired are
    /// eligible again, so delivery is at-least-once.
    async fn poll(
        &self,
        queue_name: &str,
        max_messages: usize,
        visibility_timeout_secs: u64,
    ) -> Result<Vec<QueueEntry>, TavolaError>;

    /// Acknowledge successful (or terminal) processing of an entry.
    async fn ack(&self, id: i64) -> Result<(), TavolaError>;

    /// Release a claimed entry early after a transient failure, clearing its
    /// lock so the next poll redelivers it without waiting out the window.
    async fn release(&self, id: i64) -> Result<(), TavolaError>;

    // --- Dead-letter sink ---

    /// Copy an entry into the dead-letter sink with a reason and mark the
    /// source entry terminal. Never reprocessed.
    async fn dead_letter(&self, entry: &QueueEntry, reason: &str) -> Result<(), TavolaError>;

    /// List dead-lettered entries, newest first.
    async fn list_dead_letters(&self, limit: i64) -> Result<Vec<DeadLetter>, TavolaError>;

    // --- Preference store ---

    /// Upsert the user's last validated preferences (last-writer-wins).
    async fn upsert_preference(&self, record: &PreferenceRecord) -> Result<(), TavolaError>;

    /// Fetch the user's stored preferences, if any.
    async fn get_preference(&self, user_key: &UserKey)
        -> Result<Option<PreferenceRecord>, TavolaError>;

    // --- Primary store (restaurants) ---

    /// Batch-fetch full records for the given entity ids. Ids with no
    /// corresponding record are silently dropped; input order is preserved.
    async fn get_restaurants(&self, entity_ids: &[String])
        -> Result<Vec<EntityRecord>, TavolaError>;

    /// Scan the primary store for entity ids matching cuisine and area.
    /// Used by the search resolver's fallback path.
    async fn scan_candidates(
        &self,
        cuisine: Cuisine,
        area: ServiceArea,
    ) -> Result<Vec<String>, TavolaError>;

    /// Insert or replace a restaurant record. Writes to the primary store
    /// happen only through ingestion and test seeding, never the worker.
    async fn upsert_restaurant(&self, record: &EntityRecord) -> Result<(), TavolaError>;

    // --- Notification markers (idempotency) ---

    /// Record that a notification was sent for this request id. Returns
    /// `false` if a marker already existed (duplicate processing).
    async fn mark_notified(
        &self,
        request_id: &RequestId,
        contact_address: &str,
    ) -> Result<bool, TavolaError>;

    /// Whether a notification was already recorded for this request id.
    async fn was_notified(&self, request_id: &RequestId) -> Result<bool, TavolaError>;

    // --- Monitoring ---

    /// Aggregate queue/dead-letter/notification counts.
    async fn queue_stats(&self, queue_name: &str) -> Result<QueueStats, TavolaError>;
}
