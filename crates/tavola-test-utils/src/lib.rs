// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tavola integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockNotifier`] - Notifier with captured sends and scripted failures
//! - [`MockSearchIndex`] - Search index with scripted results or forced failure
//! - [`TestHarness`] - Temp-database pipeline with a seeded restaurant set

pub mod harness;
pub mod mock_index;
pub mod mock_notifier;

pub use harness::{restaurant, TestHarness, TestHarnessBuilder};
pub use mock_index::MockSearchIndex;
pub use mock_notifier::{MockFailure, MockNotifier, SentNotification};
