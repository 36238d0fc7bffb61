// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tavola fulfillment service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// Top-level Tavola configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TavolaConfig {
    /// Service-wide settings (time zone, log level).
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Fulfillment worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Search resolver settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Outbound SMTP notification settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
}

/// Service-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Fixed UTC offset of the service time zone, e.g. `-05:00`.
    /// Relative date expressions ("today", "tomorrow") resolve against it.
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ServiceConfig {
    /// Parse `timezone_offset` into a chrono [`FixedOffset`].
    pub fn offset(&self) -> Option<FixedOffset> {
        parse_offset(&self.timezone_offset)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            timezone_offset: default_timezone_offset(),
            log_level: default_log_level(),
        }
    }
}

fn default_timezone_offset() -> String {
    // The service areas are all in the US-Eastern offset.
    "-05:00".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a `+HH:MM` / `-HH:MM` offset string.
pub(crate) fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => (1, s),
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tavola").join("tavola.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tavola.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Fulfillment worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// Fixed-rate polling interval in seconds. The worker accepts up to one
    /// interval of delivery latency in exchange for not requiring a
    /// persistently busy consumer.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum messages claimed per invocation.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Visibility timeout in seconds. Must exceed the worst-case per-message
    /// processing time so overlapping invocations never claim the same
    /// message concurrently.
    #[serde(default = "default_visibility_timeout_secs")]
    pub visibility_timeout_secs: u64,

    /// Deliveries after which a message is dead-lettered instead of retried.
    #[serde(default = "default_max_deliveries")]
    pub max_deliveries: i64,

    /// How many candidate entities to resolve per request.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Name of the request queue.
    #[serde(default = "default_queue_name")]
    pub queue_name: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            batch_size: default_batch_size(),
            visibility_timeout_secs: default_visibility_timeout_secs(),
            max_deliveries: default_max_deliveries(),
            sample_size: default_sample_size(),
            queue_name: default_queue_name(),
        }
    }
}

fn default_interval_secs() -> u64 {
    60
}

fn default_batch_size() -> usize {
    10
}

fn default_visibility_timeout_secs() -> u64 {
    300
}

fn default_max_deliveries() -> i64 {
    3
}

fn default_sample_size() -> usize {
    5
}

fn default_queue_name() -> String {
    "fulfillment".to_string()
}

/// Search resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Deadline for the primary (index) path in milliseconds.
    #[serde(default = "default_primary_timeout_ms")]
    pub primary_timeout_ms: u64,

    /// Deadline for the fallback (primary-store scan) path in milliseconds.
    #[serde(default = "default_fallback_timeout_ms")]
    pub fallback_timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            primary_timeout_ms: default_primary_timeout_ms(),
            fallback_timeout_ms: default_fallback_timeout_ms(),
        }
    }
}

fn default_primary_timeout_ms() -> u64 {
    2000
}

fn default_fallback_timeout_ms() -> u64 {
    2000
}

/// Outbound SMTP notification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    /// SMTP relay hostname. `None` disables real delivery (tests use mocks).
    #[serde(default)]
    pub host: Option<String>,

    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// SMTP username, if the relay requires authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password, if the relay requires authentication.
    #[serde(default)]
    pub password: Option<String>,

    /// Sender address for outgoing notifications.
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Deadline for a single send in seconds.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_smtp_port(),
            username: None,
            password: None,
            from_address: default_from_address(),
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "concierge@tavola.local".to_string()
}

fn default_send_timeout_secs() -> u64 {
    10
}
