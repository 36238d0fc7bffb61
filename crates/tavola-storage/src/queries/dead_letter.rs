// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dead-letter sink for messages that can never be fulfilled.
//!
//! A dead-lettered message is copied into `dead_letters` with its failure
//! reason and the source queue row is marked `dead` in the same transaction,
//! so a crash between the two steps cannot lose the terminal outcome.

use rusqlite::params;
use tavola_core::{DeadLetter, QueueEntry, TavolaError};

use crate::database::Database;

/// Move a claimed entry to the dead-letter sink.
pub async fn bury(db: &Database, entry: &QueueEntry, reason: &str) -> Result<(), TavolaError> {
    let entry = entry.clone();
    let reason = reason.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO dead_letters (queue_name, payload, reason, deliveries)
                 VALUES (?1, ?2, ?3, ?4)",
                params![entry.queue_name, entry.payload, reason, entry.deliveries],
            )?;
            tx.execute(
                "UPDATE queue
                 SET status = 'dead', locked_until = NULL,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![entry.id],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List dead letters, newest first.
pub async fn list(db: &Database, limit: usize) -> Result<Vec<DeadLetter>, TavolaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, queue_name, payload, reason, deliveries, created_at
                 FROM dead_letters
                 ORDER BY id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit as i64], |row| {
                Ok(DeadLetter {
                    id: row.get(0)?,
                    queue_name: row.get(1)?,
                    payload: row.get(2)?,
                    reason: row.get(3)?,
                    deliveries: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<DeadLetter>, _>>()?)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn count(db: &Database) -> Result<i64, TavolaError> {
    db.connection()
        .call(|conn| {
            let n: i64 =
                conn.query_row("SELECT COUNT(*) FROM dead_letters", [], |row| row.get(0))?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::queue;
    use tempfile::tempdir;

    #[tokio::test]
    async fn bury_records_reason_and_kills_queue_row() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap(), true)
            .await
            .unwrap();

        queue::enqueue(&db, "fulfillment", "{\"bad\":true}")
            .await
            .unwrap();
        let claimed = queue::poll(&db, "fulfillment", 1, 0).await.unwrap();
        assert_eq!(claimed.len(), 1);

        bury(&db, &claimed[0], "malformed payload").await.unwrap();

        // The dead row must not be claimable again, even with an expired lock.
        let again = queue::poll(&db, "fulfillment", 10, 0).await.unwrap();
        assert!(again.is_empty());

        let letters = list(&db, 10).await.unwrap();
        assert_eq!(letters.len(), 1);
        assert_eq!(letters[0].reason, "malformed payload");
        assert_eq!(letters[0].payload, "{\"bad\":true}");
        assert_eq!(letters[0].deliveries, 1);
        assert_eq!(count(&db).await.unwrap(), 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap(), true)
            .await
            .unwrap();

        for payload in ["a", "b", "c"] {
            queue::enqueue(&db, "fulfillment", payload).await.unwrap();
        }
        let claimed = queue::poll(&db, "fulfillment", 3, 0).await.unwrap();
        for entry in &claimed {
            bury(&db, entry, "expired").await.unwrap();
        }

        let letters = list(&db, 2).await.unwrap();
        assert_eq!(letters.len(), 2);
        assert_eq!(letters[0].payload, "c");
        assert_eq!(letters[1].payload, "b");

        db.close().await.unwrap();
    }
}
