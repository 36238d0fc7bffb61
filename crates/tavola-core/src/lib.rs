// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tavola fulfillment service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Tavola workspace. All pipeline adapters
//! implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TavolaError;
pub use types::{
    AdapterType, Cuisine, DeadLetter, EntityRecord, FulfillmentRequest,
    HealthStatus, PreferenceRecord, QueueEntry, RequestId, ServiceArea, UserKey,
};

// Re-export all adapter traits at crate root.
pub use traits::{Notifier, PluginAdapter, QueueStats, SearchIndex, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        let variants = [
            AdapterType::Storage,
            AdapterType::SearchIndex,
            AdapterType::Notifier,
        ];
        for variant in &variants {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // If any seam trait is missing or fails to compile, this won't build.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_search_index<T: SearchIndex>() {}
        fn _assert_notifier<T: Notifier>() {}
    }
}
