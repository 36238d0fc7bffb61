// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL query modules, one per table family.

pub mod dead_letter;
pub mod notifications;
pub mod preferences;
pub mod queue;
pub mod restaurants;
pub mod search_index;
