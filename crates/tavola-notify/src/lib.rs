// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification channel for the Tavola fulfillment pipeline.
//!
//! Renders recommendation sets into an HTML document with a plain-text
//! alternative and delivers them over SMTP.

pub mod render;
pub mod smtp;

pub use smtp::SmtpNotifier;
