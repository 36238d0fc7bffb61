// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Tavola pipeline seams.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod notify;
pub mod search;
pub mod storage;

pub use adapter::PluginAdapter;
pub use notify::Notifier;
pub use search::SearchIndex;
pub use storage::{QueueStats, StorageAdapter};
