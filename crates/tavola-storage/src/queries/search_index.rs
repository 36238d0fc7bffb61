// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate index operations.
//!
//! The index holds a minimal (entity_id, cuisine, area) projection of the
//! primary store. Queries rank randomly so repeated requests surface
//! different candidates.

use rusqlite::params;
use tavola_core::{Cuisine, ServiceArea, TavolaError};

use crate::database::Database;

/// Random sample of entity ids matching cuisine and area.
pub async fn query_random(
    db: &Database,
    cuisine: Cuisine,
    area: ServiceArea,
    limit: usize,
) -> Result<Vec<String>, TavolaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT entity_id FROM search_index
                 WHERE cuisine = ?1 AND area = ?2
                 ORDER BY RANDOM()
                 LIMIT ?3",
            )?;
            let rows = stmt.query_map(
                params![cuisine.to_string(), area.to_string(), limit as i64],
                |row| row.get(0),
            )?;
            Ok(rows.collect::<Result<Vec<String>, _>>()?)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Rebuild the index from the primary store. Returns the row count.
pub async fn rebuild(db: &Database) -> Result<usize, TavolaError> {
    db.connection()
        .call(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM search_index", [])?;
            let inserted = tx.execute(
                "INSERT INTO search_index (entity_id, cuisine, area)
                 SELECT entity_id, cuisine, area FROM restaurants",
                [],
            )?;
            tx.commit()?;
            Ok(inserted)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
