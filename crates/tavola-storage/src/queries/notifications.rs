// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Idempotency markers for sent notifications.
//!
//! One row per request id. The worker checks the marker before sending and
//! writes it after, which bounds duplicate sends under at-least-once
//! delivery.

use rusqlite::params;
use tavola_core::{RequestId, TavolaError};

use crate::database::Database;

/// Record that a notification went out for this request.
///
/// Returns `true` if this call created the marker, `false` if one already
/// existed.
pub async fn mark(
    db: &Database,
    request_id: &RequestId,
    contact_address: &str,
) -> Result<bool, TavolaError> {
    let request_id = request_id.0.clone();
    let contact_address = contact_address.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO notifications (request_id, contact_address, sent_at)
                 VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
                params![request_id, contact_address],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether a notification marker exists for this request.
pub async fn exists(db: &Database, request_id: &RequestId) -> Result<bool, TavolaError> {
    let request_id = request_id.0.clone();
    db.connection()
        .call(move |conn| {
            let found: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM notifications WHERE request_id = ?1)",
                params![request_id],
                |row| row.get(0),
            )?;
            Ok(found)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn count(db: &Database) -> Result<i64, TavolaError> {
    db.connection()
        .call(|conn| {
            let n: i64 =
                conn.query_row("SELECT COUNT(*) FROM notifications", [], |row| row.get(0))?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
