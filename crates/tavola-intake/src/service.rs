// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake service: the seam between the dialog layer and the pipeline.
//!
//! The dialog engine itself is out of scope; callers hand over a complete
//! slot set (or a recall trigger) and the service validates, records
//! preferences, and enqueues.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use tavola_core::{
    FulfillmentRequest, PreferenceRecord, RequestId, StorageAdapter, TavolaError, UserKey,
};

use crate::validator::{self, RawSlots, ValidationError};

/// Intake failure: either the slots were invalid or the pipeline itself is
/// unavailable.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Service(#[from] TavolaError),
}

pub struct IntakeService {
    storage: Arc<dyn StorageAdapter>,
    queue_name: String,
    zone: FixedOffset,
}

impl IntakeService {
    pub fn new(storage: Arc<dyn StorageAdapter>, queue_name: impl Into<String>, zone: FixedOffset) -> Self {
        Self {
            storage,
            queue_name: queue_name.into(),
            zone,
        }
    }

    /// The current instant in the service zone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.zone)
    }

    /// Handle a completed slot set: validate, record preferences, enqueue.
    ///
    /// Invalid slots leave no trace: nothing is stored and nothing is
    /// enqueued. A preference upsert failure also stops the enqueue, so the
    /// caller can surface a transient error and retry the whole intake.
    pub async fn on_slots_complete(
        &self,
        session_id: &str,
        slots: &RawSlots,
    ) -> Result<RequestId, IntakeError> {
        let user_key = UserKey::derive(session_id);
        let request = validator::validate(slots, &user_key, self.now())?;

        self.store_and_enqueue(&request).await?;
        info!(
            request_id = %request.request_id,
            user_key = %request.user_key,
            area = %request.area,
            cuisine = %request.cuisine,
            "request accepted"
        );
        Ok(request.request_id)
    }

    /// Greeting hook: surface the user's previous preferences, if any, so
    /// the dialog layer can offer "same as last time".
    pub async fn on_greeting(
        &self,
        session_id: &str,
    ) -> Result<Option<PreferenceRecord>, TavolaError> {
        let user_key = UserKey::derive(session_id);
        self.storage.get_preference(&user_key).await
    }

    /// Re-enqueue the user's stored preferences with a fresh request id and
    /// a caller-supplied dining instant.
    ///
    /// Returns `Ok(false)` when no prior request exists (a no-op, not an
    /// error). Stored fields are revalidated before enqueueing; a record
    /// that no longer validates is treated the same as an absent one.
    pub async fn recall(
        &self,
        session_id: &str,
        dining_at: DateTime<FixedOffset>,
    ) -> Result<bool, IntakeError> {
        let user_key = UserKey::derive(session_id);
        let Some(record) = self.storage.get_preference(&user_key).await? else {
            debug!(user_key = %user_key, "recall without prior request");
            return Ok(false);
        };

        if dining_at <= self.now() {
            return Err(ValidationError::PastDate {
                value: dining_at.to_rfc3339(),
            }
            .into());
        }
        if !(1..=20).contains(&record.party_size) {
            warn!(user_key = %user_key, party_size = record.party_size, "stored preference no longer valid");
            return Ok(false);
        }

        let request = FulfillmentRequest {
            request_id: RequestId::generate(),
            user_key: record.user_key,
            area: record.area,
            cuisine: record.cuisine,
            party_size: record.party_size,
            dining_at,
            contact_address: record.contact_address,
        };
        self.store_and_enqueue(&request).await?;
        info!(request_id = %request.request_id, user_key = %request.user_key, "recall accepted");
        Ok(true)
    }

    async fn store_and_enqueue(&self, request: &FulfillmentRequest) -> Result<(), TavolaError> {
        let record = PreferenceRecord {
            user_key: request.user_key.clone(),
            area: request.area,
            cuisine: request.cuisine,
            party_size: request.party_size,
            contact_address: request.contact_address.clone(),
            updated_at: String::new(),
        };
        self.storage.upsert_preference(&record).await?;

        let payload = serde_json::to_string(request)
            .map_err(|e| TavolaError::Internal(format!("request serialization: {e}")))?;
        let entry_id = self.storage.enqueue(&self.queue_name, &payload).await?;
        debug!(entry_id, queue = %self.queue_name, "request enqueued");
        Ok(())
    }
}
