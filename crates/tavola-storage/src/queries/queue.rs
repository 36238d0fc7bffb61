// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request queue operations: at-least-once delivery with visibility locks.

use rusqlite::params;
use tavola_core::{QueueEntry, TavolaError};

use crate::database::Database;

const ENTRY_COLUMNS: &str =
    "id, queue_name, payload, status, deliveries, locked_until, created_at, updated_at";

fn map_entry(row: &rusqlite::Row<'_>) -> Result<QueueEntry, rusqlite::Error> {
    Ok(QueueEntry {
        id: row.get(0)?,
        queue_name: row.get(1)?,
        payload: row.get(2)?,
        status: row.get(3)?,
        deliveries: row.get(4)?,
        locked_until: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Enqueue a new payload. Returns the auto-generated queue entry ID.
pub async fn enqueue(
    db: &Database,
    queue_name: &str,
    payload: &str,
) -> Result<i64, TavolaError> {
    let queue_name = queue_name.to_string();
    let payload = payload.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO queue (queue_name, payload) VALUES (?1, ?2)",
                params![queue_name, payload],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Claim up to `max_messages` entries from the named queue.
///
/// Atomically selects the oldest eligible entries and marks them
/// "processing" with a lock expiring after `visibility_timeout_secs`.
/// Eligible means pending, or processing with an expired lock -- the latter
/// is how unacknowledged messages become redeliverable. Each claim
/// increments the entry's delivery counter.
pub async fn poll(
    db: &Database,
    queue_name: &str,
    max_messages: usize,
    visibility_timeout_secs: u64,
) -> Result<Vec<QueueEntry>, TavolaError> {
    let queue_name = queue_name.to_string();
    db.connection()
        .call(move |conn| {
            // One transaction for find + claim so two overlapping pollers
            // never take the same entry.
            let tx = conn.transaction()?;

            let ids: Vec<i64> = {
                let mut stmt = tx.prepare(
                    "SELECT id FROM queue
                     WHERE queue_name = ?1
                       AND (status = 'pending'
                            OR (status = 'processing'
                                AND locked_until IS NOT NULL
                                AND locked_until <= strftime('%Y-%m-%dT%H:%M:%fZ', 'now')))
                     ORDER BY id ASC
                     LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![queue_name, max_messages as i64], |row| {
                    row.get(0)
                })?;
                rows.collect::<Result<Vec<i64>, _>>()?
            };

            let mut entries = Vec::with_capacity(ids.len());
            for id in ids {
                tx.execute(
                    "UPDATE queue SET status = 'processing',
                     deliveries = deliveries + 1,
                     locked_until = strftime('%Y-%m-%dT%H:%M:%fZ', 'now', '+' || ?2 || ' seconds'),
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE id = ?1",
                    params![id, visibility_timeout_secs as i64],
                )?;
                let entry = {
                    let mut stmt =
                        tx.prepare(&format!("SELECT {ENTRY_COLUMNS} FROM queue WHERE id = ?1"))?;
                    stmt.query_row(params![id], map_entry)?
                };
                entries.push(entry);
            }

            tx.commit()?;
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Acknowledge processing of a queue entry, marking it "completed".
pub async fn ack(db: &Database, id: i64) -> Result<(), TavolaError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE queue SET status = 'completed',
                 locked_until = NULL,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Release a claimed entry back to "pending" after a transient failure.
///
/// Clears the lock so the next poll redelivers immediately instead of
/// waiting out the remaining visibility window. The delivery counter is
/// left as-is; it only moves on claims.
pub async fn release(db: &Database, id: i64) -> Result<(), TavolaError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE queue SET status = 'pending',
                 locked_until = NULL,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark an entry terminal ("dead") without completing it. Paired with a
/// dead-letter copy by [`crate::queries::dead_letter::bury`].
pub async fn mark_dead(db: &Database, id: i64) -> Result<(), TavolaError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE queue SET status = 'dead',
                 locked_until = NULL,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count queue entries by status.
pub async fn count_by_status(
    db: &Database,
    queue_name: &str,
    status: &str,
) -> Result<i64, TavolaError> {
    let queue_name = queue_name.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM queue WHERE queue_name = ?1 AND status = ?2",
                params![queue_name, status],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
