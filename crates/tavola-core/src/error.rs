// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tavola fulfillment service.

use thiserror::Error;

/// The primary error type used across all Tavola adapter traits and pipeline operations.
#[derive(Debug, Error)]
pub enum TavolaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Search index errors (query failure, index corruption).
    #[error("search error: {message}")]
    Search {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Neither the search index nor the primary-store fallback produced a
    /// result within its deadline. Treated as transient by the worker.
    #[error("search unavailable: {message}")]
    SearchUnavailable { message: String },

    /// Notification channel errors (SMTP connection, send failure).
    #[error("notify error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The contact address cannot be parsed. Permanent: retrying a send to a
    /// malformed address can never succeed, so the worker dead-letters it.
    #[error("malformed contact address")]
    MalformedAddress,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TavolaError {
    /// Whether this failure is permanent for a queue message.
    ///
    /// Permanent failures are acknowledged and dead-lettered; everything else
    /// is left to the queue's redelivery mechanics.
    pub fn is_permanent(&self) -> bool {
        matches!(self, TavolaError::MalformedAddress)
    }
}
