// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Tavola fulfillment worker.
//!
//! Polls the request queue at a fixed interval and, for each claimed
//! message, resolves candidates, hydrates details from the primary store,
//! and sends the notification. At-least-once queue semantics are reconciled
//! by per-request idempotency markers; unprocessable messages go to the
//! dead-letter sink.

pub mod runner;
pub mod worker;

pub use runner::WorkerRunner;
pub use worker::{BatchOutcome, FulfillmentWorker};
