// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Primary store operations for restaurant records.
//!
//! The fulfillment path only reads this table; writes come from ingestion
//! and test seeding.

use std::str::FromStr;

use rusqlite::params;
use tavola_core::{Cuisine, EntityRecord, ServiceArea, TavolaError};

use crate::database::Database;

const RECORD_COLUMNS: &str = "entity_id, name, address, latitude, longitude, review_count, \
                              rating, phone, cuisine, area, price_range, categories, inserted_at";

fn map_record(row: &rusqlite::Row<'_>) -> Result<EntityRecord, rusqlite::Error> {
    let cuisine: String = row.get(8)?;
    let area: String = row.get(9)?;
    let categories_json: String = row.get(11)?;
    Ok(EntityRecord {
        entity_id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        review_count: row.get(5)?,
        rating: row.get(6)?,
        phone: row.get(7)?,
        cuisine: Cuisine::from_str(&cuisine).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?,
        area: ServiceArea::from_str(&area).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
        })?,
        price_range: row.get(10)?,
        categories: serde_json::from_str(&categories_json).unwrap_or_default(),
        inserted_at: row.get(12)?,
    })
}

/// Insert or replace a restaurant record.
pub async fn upsert(db: &Database, record: &EntityRecord) -> Result<(), TavolaError> {
    let categories = serde_json::to_string(&record.categories)
        .map_err(|e| TavolaError::Internal(format!("categories serialization: {e}")))?;
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO restaurants
                 (entity_id, name, address, latitude, longitude, review_count,
                  rating, phone, cuisine, area, price_range, categories, inserted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                         COALESCE(NULLIF(?13, ''), strftime('%Y-%m-%dT%H:%M:%fZ', 'now')))",
                params![
                    record.entity_id,
                    record.name,
                    record.address,
                    record.latitude,
                    record.longitude,
                    record.review_count,
                    record.rating,
                    record.phone,
                    record.cuisine.to_string(),
                    record.area.to_string(),
                    record.price_range,
                    categories,
                    record.inserted_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Batch-fetch full records for the given entity ids.
///
/// Ids with no corresponding record are silently dropped (the candidate
/// index can lag the store); input order is preserved for the rest.
pub async fn get_many(
    db: &Database,
    entity_ids: &[String],
) -> Result<Vec<EntityRecord>, TavolaError> {
    let entity_ids = entity_ids.to_vec();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {RECORD_COLUMNS} FROM restaurants WHERE entity_id = ?1"))?;
            let mut records = Vec::with_capacity(entity_ids.len());
            for id in &entity_ids {
                match stmt.query_row(params![id], map_record) {
                    Ok(record) => records.push(record),
                    Err(rusqlite::Error::QueryReturnedNoRows) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(records)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Scan for entity ids matching cuisine and area.
///
/// The search resolver's fallback path; deterministic, sampling happens
/// client-side.
pub async fn scan_candidates(
    db: &Database,
    cuisine: Cuisine,
    area: ServiceArea,
) -> Result<Vec<String>, TavolaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT entity_id FROM restaurants
                 WHERE cuisine = ?1 AND area = ?2
                 ORDER BY entity_id ASC",
            )?;
            let rows =
                stmt.query_map(params![cuisine.to_string(), area.to_string()], |row| {
                    row.get(0)
                })?;
            Ok(rows.collect::<Result<Vec<String>, _>>()?)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
