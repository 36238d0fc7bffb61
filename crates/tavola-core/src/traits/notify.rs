// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier trait for out-of-band recommendation delivery.

use async_trait::async_trait;

use crate::error::TavolaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EntityRecord, FulfillmentRequest};

/// Adapter for the notification channel.
///
/// Delivery is at-least-once: the worker may invoke the same notification
/// twice across redeliveries, so it de-duplicates by request id before the
/// final acknowledge rather than relying on the channel itself.
#[async_trait]
pub trait Notifier: PluginAdapter {
    /// Render and send the recommendation set to the request's contact
    /// address.
    ///
    /// Returns [`TavolaError::MalformedAddress`] when the address cannot be
    /// parsed (permanent); any other failure is transient and subject to the
    /// queue's redelivery policy.
    async fn notify(
        &self,
        request: &FulfillmentRequest,
        entities: &[EntityRecord],
    ) -> Result<(), TavolaError>;

    /// Send the distinct non-retryable "no matches" notification, used when
    /// the primary store genuinely holds no record for the requested cuisine
    /// and area.
    async fn notify_no_matches(&self, request: &FulfillmentRequest) -> Result<(), TavolaError>;
}
