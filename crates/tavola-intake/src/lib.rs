// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake layer for the Tavola fulfillment pipeline.
//!
//! Validates raw dining-request slots into immutable requests, records
//! per-user preferences, enqueues work for the fulfillment worker, and
//! dispatches "same as last time" recalls.

pub mod service;
pub mod validator;

pub use service::{IntakeError, IntakeService};
pub use validator::{RawSlots, ValidationError};
