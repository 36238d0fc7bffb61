// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Tavola pipeline.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strum::{Display, EnumString};

/// Unique identifier for a fulfillment request, generated at validation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a fresh random request id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable hashed identity of a requester.
///
/// Derived from the session/contact identity via SHA-256, truncated to 16 hex
/// characters. The raw identity is never stored or logged as a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserKey(pub String);

impl UserKey {
    /// Derive a user key from a raw identity string.
    pub fn derive(raw_identity: &str) -> Self {
        let digest = Sha256::digest(raw_identity.as_bytes());
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        Self(hex[..16].to_string())
    }
}

impl std::fmt::Display for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Service areas the fulfillment pipeline covers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ServiceArea {
    Manhattan,
    Brooklyn,
    Queens,
    Bronx,
    #[strum(serialize = "Staten Island")]
    #[serde(rename = "Staten Island")]
    StatenIsland,
    #[strum(serialize = "Jersey City")]
    #[serde(rename = "Jersey City")]
    JerseyCity,
    Hoboken,
    #[strum(serialize = "Long Island City")]
    #[serde(rename = "Long Island City")]
    LongIslandCity,
}

/// Cuisine categories the fulfillment pipeline covers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Cuisine {
    Japanese,
    Italian,
    Chinese,
    Mexican,
    Indian,
    Thai,
    Korean,
    French,
    Mediterranean,
    American,
    Vietnamese,
    Spanish,
}

/// The unit of work flowing through the queue.
///
/// Immutable once validated: all fields are non-null and within their
/// enumerated/bounded domains, and `dining_at` was strictly in the future at
/// validation time. A request failing any constraint is never enqueued.
///
/// Serializes to the JSON queue wire format and must round-trip losslessly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentRequest {
    pub request_id: RequestId,
    pub user_key: UserKey,
    pub area: ServiceArea,
    pub cuisine: Cuisine,
    /// Bounded to `[1, 20]` by the validator.
    pub party_size: u8,
    /// Resolved in the service's configured time zone.
    pub dining_at: DateTime<FixedOffset>,
    pub contact_address: String,
}

/// Last-known validated request per user, keyed by hashed [`UserKey`].
///
/// Created/overwritten on every successful validation (last-writer-wins),
/// consumed read-only by the recall dispatcher, never deleted automatically.
/// Date fields are deliberately absent: recall always needs a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub user_key: UserKey,
    pub area: ServiceArea,
    pub cuisine: Cuisine,
    pub party_size: u8,
    pub contact_address: String,
    pub updated_at: String,
}

/// A queue entry: serialized request payload plus the delivery envelope.
///
/// Owned by the queue. The worker borrows it for the duration of processing
/// and must explicitly [`ack`](crate::traits::StorageAdapter::ack) on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: i64,
    pub queue_name: String,
    pub payload: String,
    /// `pending`, `processing`, `completed`, or `dead`.
    pub status: String,
    /// How many times this entry has been claimed. Incremented on every poll
    /// that returns it, including redeliveries after visibility expiry.
    pub deliveries: i64,
    /// While set and in the future, the entry is invisible to other polls.
    pub locked_until: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A dead-lettered entry: terminal, never reprocessed.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    pub id: i64,
    pub queue_name: String,
    pub payload: String,
    pub reason: String,
    pub deliveries: i64,
    pub created_at: String,
}

/// Full detail record for a restaurant. Source of truth lives in the primary
/// store; the detail resolver is the only downstream path to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity_id: String,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub review_count: i64,
    pub rating: f64,
    pub phone: Option<String>,
    pub cuisine: Cuisine,
    pub area: ServiceArea,
    pub price_range: Option<String>,
    pub categories: Vec<String>,
    pub inserted_at: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a pipeline seam.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    SearchIndex,
    Notifier,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn user_key_is_stable_and_hashed() {
        let a = UserKey::derive("session-abc");
        let b = UserKey::derive("session-abc");
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 16);
        assert!(!a.0.contains("session"), "raw identity must not leak");
        assert_ne!(a, UserKey::derive("session-xyz"));
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::generate(), RequestId::generate());
    }

    #[test]
    fn service_area_parses_multiword_names() {
        assert_eq!(
            ServiceArea::from_str("staten island").unwrap(),
            ServiceArea::StatenIsland
        );
        assert_eq!(
            ServiceArea::from_str("Long Island City").unwrap(),
            ServiceArea::LongIslandCity
        );
        assert_eq!(ServiceArea::StatenIsland.to_string(), "Staten Island");
        assert!(ServiceArea::from_str("Boston").is_err());
    }

    #[test]
    fn cuisine_parses_case_insensitively() {
        assert_eq!(Cuisine::from_str("japanese").unwrap(), Cuisine::Japanese);
        assert_eq!(Cuisine::from_str("THAI").unwrap(), Cuisine::Thai);
        assert!(Cuisine::from_str("fusion").is_err());
    }

    #[test]
    fn fulfillment_request_round_trips_through_json() {
        let request = FulfillmentRequest {
            request_id: RequestId::generate(),
            user_key: UserKey::derive("session-1"),
            area: ServiceArea::JerseyCity,
            cuisine: Cuisine::Mediterranean,
            party_size: 4,
            dining_at: DateTime::parse_from_rfc3339("2027-06-01T19:30:00-05:00").unwrap(),
            contact_address: "user@example.com".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        let parsed: FulfillmentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, parsed);
    }

    #[test]
    fn multiword_area_serializes_with_spaces() {
        let json = serde_json::to_string(&ServiceArea::LongIslandCity).unwrap();
        assert_eq!(json, "\"Long Island City\"");
        let parsed: ServiceArea = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ServiceArea::LongIslandCity);
    }
}
