// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tavola.toml` > `~/.config/tavola/tavola.toml` > `/etc/tavola/tavola.toml`
//! with environment variable overrides via `TAVOLA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TavolaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tavola/tavola.toml` (system-wide)
/// 3. `~/.config/tavola/tavola.toml` (user XDG config)
/// 4. `./tavola.toml` (local directory)
/// 5. `TAVOLA_*` environment variables
pub fn load_config() -> Result<TavolaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and for callers that supply config inline.
pub fn load_config_from_str(toml_content: &str) -> Result<TavolaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TavolaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TavolaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TavolaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TavolaConfig::default()))
        .merge(Toml::file("/etc/tavola/tavola.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tavola/tavola.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tavola.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TAVOLA_WORKER_BATCH_SIZE` must map to
/// `worker.batch_size`, not `worker.batch.size`.
fn env_provider() -> Env {
    Env::prefixed("TAVOLA_").map(|key| {
        // `key` keeps the env var's original casing, so normalize before
        // matching section prefixes.
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("worker_", "worker.", 1)
            .replacen("search_", "search.", 1)
            .replacen("smtp_", "smtp.", 1);
        mapped.into()
    })
}
