// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate search for the Tavola fulfillment pipeline.
//!
//! A SQLite-backed candidate index with randomized ranking, plus a resolver
//! that degrades to a deterministic primary-store scan when the index is
//! unavailable.

pub mod index;
pub mod resolver;

pub use index::SqliteSearchIndex;
pub use resolver::SearchResolver;
