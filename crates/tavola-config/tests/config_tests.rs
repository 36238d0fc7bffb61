// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Tavola configuration system.

use tavola_config::diagnostic::{ConfigError, suggest_key};
use tavola_config::model::TavolaConfig;
use tavola_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_tavola_config() {
    let toml = r#"
[service]
timezone_offset = "-08:00"
log_level = "debug"

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[worker]
interval_secs = 30
batch_size = 5
visibility_timeout_secs = 120
max_deliveries = 5
sample_size = 3
queue_name = "dining"

[search]
primary_timeout_ms = 1000
fallback_timeout_ms = 3000

[smtp]
host = "smtp.example.com"
port = 2525
username = "mailer"
password = "hunter2"
from_address = "noreply@example.com"
send_timeout_secs = 5
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.timezone_offset, "-08:00");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.worker.interval_secs, 30);
    assert_eq!(config.worker.batch_size, 5);
    assert_eq!(config.worker.visibility_timeout_secs, 120);
    assert_eq!(config.worker.max_deliveries, 5);
    assert_eq!(config.worker.sample_size, 3);
    assert_eq!(config.worker.queue_name, "dining");
    assert_eq!(config.search.primary_timeout_ms, 1000);
    assert_eq!(config.search.fallback_timeout_ms, 3000);
    assert_eq!(config.smtp.host.as_deref(), Some("smtp.example.com"));
    assert_eq!(config.smtp.port, 2525);
    assert_eq!(config.smtp.username.as_deref(), Some("mailer"));
    assert_eq!(config.smtp.from_address, "noreply@example.com");
    assert_eq!(config.smtp.send_timeout_secs, 5);
}

/// Unknown field in [worker] section produces an error.
#[test]
fn unknown_field_in_worker_produces_error() {
    let toml = r#"
[worker]
intervall_secs = 15
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("intervall_secs"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.service.timezone_offset, "-05:00");
    assert_eq!(config.service.log_level, "info");
    assert!(config.storage.database_path.ends_with("tavola.db"));
    assert!(config.storage.wal_mode);
    assert_eq!(config.worker.interval_secs, 60);
    assert_eq!(config.worker.batch_size, 10);
    assert_eq!(config.worker.visibility_timeout_secs, 300);
    assert_eq!(config.worker.max_deliveries, 3);
    assert_eq!(config.worker.sample_size, 5);
    assert_eq!(config.worker.queue_name, "fulfillment");
    assert_eq!(config.search.primary_timeout_ms, 2000);
    assert_eq!(config.search.fallback_timeout_ms, 2000);
    assert!(config.smtp.host.is_none());
    assert_eq!(config.smtp.port, 587);
    assert_eq!(config.smtp.from_address, "concierge@tavola.local");
}

/// Environment-style dotted overrides take precedence over TOML values.
#[test]
fn dotted_override_beats_toml_value() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let toml_content = r#"
[worker]
queue_name = "from-toml"
"#;

    let config: TavolaConfig = Figment::new()
        .merge(Serialized::defaults(TavolaConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("worker.queue_name", "from-env"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.worker.queue_name, "from-env");
}

/// `TAVOLA_SMTP_FROM_ADDRESS` maps to `smtp.from_address`
/// (NOT smtp.from.address despite the embedded underscore).
#[test]
fn dotted_key_reaches_underscored_field() {
    use figment::{Figment, providers::Serialized};

    let config: TavolaConfig = Figment::new()
        .merge(Serialized::defaults(TavolaConfig::default()))
        .merge(("smtp.from_address", "env@example.com"))
        .extract()
        .expect("should set from_address via dot notation");

    assert_eq!(config.smtp.from_address, "env@example.com");
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: TavolaConfig = Figment::new()
        .merge(Serialized::defaults(TavolaConfig::default()))
        .merge(Toml::file("/nonexistent/path/tavola.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.worker.queue_name, "fulfillment");
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[mailer]
host = "smtp.example.com"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("mailer"),
        "error should mention unknown field, got: {err_str}"
    );
}

// ============================================================================
// Diagnostic tests
// ============================================================================

/// Unknown key "intervall_secs" produces suggestion "interval_secs".
#[test]
fn diagnostic_intervall_suggests_interval() {
    let valid_keys = &[
        "interval_secs",
        "batch_size",
        "visibility_timeout_secs",
        "max_deliveries",
        "sample_size",
        "queue_name",
    ];
    let suggestion = suggest_key("intervall_secs", valid_keys);
    assert_eq!(suggestion, Some("interval_secs".to_string()));
}

/// Unknown key "zzzzzz" with no close match does NOT produce a suggestion.
#[test]
fn diagnostic_no_suggestion_for_distant_typo() {
    let valid_keys = &["interval_secs", "batch_size", "queue_name"];
    let suggestion = suggest_key("zzzzzz", valid_keys);
    assert!(suggestion.is_none(), "should not suggest for distant typo");
}

/// Error output from load_and_validate_str includes the unknown key name.
#[test]
fn diagnostic_error_includes_unknown_key() {
    let toml = r#"
[worker]
intervall_secs = 15
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    assert!(!errors.is_empty(), "should have at least one error");

    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "intervall_secs"
                && suggestion.as_deref() == Some("interval_secs")
                && valid_keys.contains("batch_size")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'intervall_secs' with suggestion, got: {errors:?}"
    );
}

/// Invalid type (string where number expected) produces clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[worker]
batch_size = "not_a_number"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("batch_size"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// ConfigError implements miette::Diagnostic (can be rendered).
#[test]
fn config_error_implements_diagnostic() {
    use miette::Diagnostic;

    let error = ConfigError::UnknownKey {
        key: "intervall_secs".to_string(),
        suggestion: Some("interval_secs".to_string()),
        valid_keys: "interval_secs, batch_size, queue_name".to_string(),
        span: None,
        src: None,
    };

    let code = error.code();
    assert!(code.is_some(), "should have diagnostic code");

    let help = error.help();
    assert!(help.is_some(), "should have help text");
    let help_str = help.unwrap().to_string();
    assert!(
        help_str.contains("did you mean `interval_secs`"),
        "help should contain suggestion, got: {help_str}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::GraphicalReportHandler;

    let error = ConfigError::UnknownKey {
        key: "intervall_secs".to_string(),
        suggestion: Some("interval_secs".to_string()),
        valid_keys: "interval_secs, batch_size, queue_name".to_string(),
        span: None,
        src: None,
    };

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(!buf.is_empty(), "rendered report should not be empty");
    assert!(
        buf.contains("intervall_secs"),
        "rendered report should mention the key"
    );
}

/// load_and_validate_str with valid TOML returns Ok config.
#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[worker]
queue_name = "dining"
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.worker.queue_name, "dining");
}

/// Validation catches a zero sample size.
#[test]
fn validation_catches_zero_sample_size() {
    let toml = r#"
[worker]
sample_size = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero sample size should fail");
    let has_validation_error = errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("sample_size"))
    });
    assert!(
        has_validation_error,
        "should have validation error for sample_size"
    );
}

/// Validation catches an unparseable time zone offset.
#[test]
fn validation_catches_bad_offset() {
    let toml = r#"
[service]
timezone_offset = "eastern"
"#;

    let errors = load_and_validate_str(toml).expect_err("bad offset should fail");
    let has_validation_error = errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("timezone_offset"))
    });
    assert!(
        has_validation_error,
        "should have validation error for timezone_offset"
    );
}
