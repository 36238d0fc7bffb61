// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: positive intervals, bounded sample sizes, parseable time zone
//! offsets and sender addresses.

use crate::diagnostic::ConfigError;
use crate::model::{TavolaConfig, parse_offset};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TavolaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.worker.interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "worker.interval_secs must be positive".to_string(),
        });
    }

    if config.worker.batch_size == 0 {
        errors.push(ConfigError::Validation {
            message: "worker.batch_size must be positive".to_string(),
        });
    }

    // The visibility timeout is what keeps overlapping worker invocations
    // from claiming the same message; zero would redeliver mid-processing.
    if config.worker.visibility_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "worker.visibility_timeout_secs must be positive".to_string(),
        });
    }

    if config.worker.max_deliveries < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "worker.max_deliveries must be at least 1, got {}",
                config.worker.max_deliveries
            ),
        });
    }

    if config.worker.sample_size == 0 || config.worker.sample_size > 10 {
        errors.push(ConfigError::Validation {
            message: format!(
                "worker.sample_size must be between 1 and 10, got {}",
                config.worker.sample_size
            ),
        });
    }

    if config.search.primary_timeout_ms == 0 || config.search.fallback_timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "search timeouts must be positive".to_string(),
        });
    }

    if parse_offset(&config.service.timezone_offset).is_none() {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.timezone_offset `{}` is not a valid +HH:MM offset",
                config.service.timezone_offset
            ),
        });
    }

    // Pragmatic shape check; the notifier does strict parsing at send time.
    let from = config.smtp.from_address.trim();
    if from.is_empty() || !from.contains('@') || !from.contains('.') {
        errors.push(ConfigError::Validation {
            message: format!("smtp.from_address `{from}` is not a valid address"),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TavolaConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = TavolaConfig::default();
        config.worker.interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("interval_secs")));
    }

    #[test]
    fn oversized_sample_is_rejected() {
        let mut config = TavolaConfig::default();
        config.worker.sample_size = 50;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn bad_offset_is_rejected() {
        let mut config = TavolaConfig::default();
        config.service.timezone_offset = "eastern".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("timezone_offset")));
    }

    #[test]
    fn bad_from_address_is_rejected() {
        let mut config = TavolaConfig::default();
        config.smtp.from_address = "not-an-address".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = TavolaConfig::default();
        config.worker.interval_secs = 0;
        config.worker.batch_size = 0;
        config.worker.max_deliveries = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
