// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Preference store operations: last validated request per hashed user key.

use std::str::FromStr;

use rusqlite::params;
use tavola_core::{Cuisine, PreferenceRecord, ServiceArea, TavolaError, UserKey};

use crate::database::Database;

fn map_record(row: &rusqlite::Row<'_>) -> Result<PreferenceRecord, rusqlite::Error> {
    let area: String = row.get(1)?;
    let cuisine: String = row.get(2)?;
    Ok(PreferenceRecord {
        user_key: UserKey(row.get(0)?),
        area: ServiceArea::from_str(&area).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        cuisine: Cuisine::from_str(&cuisine).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
        party_size: row.get::<_, i64>(3)? as u8,
        contact_address: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Upsert the user's last validated preferences. Last-writer-wins: exactly
/// one session is ever active per user at validation time, so no versioning
/// is needed.
pub async fn upsert(db: &Database, record: &PreferenceRecord) -> Result<(), TavolaError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO preferences (user_key, area, cuisine, party_size, contact_address, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT(user_key) DO UPDATE SET
                   area = excluded.area,
                   cuisine = excluded.cuisine,
                   party_size = excluded.party_size,
                   contact_address = excluded.contact_address,
                   updated_at = excluded.updated_at",
                params![
                    record.user_key.0,
                    record.area.to_string(),
                    record.cuisine.to_string(),
                    record.party_size as i64,
                    record.contact_address,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch the user's stored preferences, if any.
pub async fn get(
    db: &Database,
    user_key: &UserKey,
) -> Result<Option<PreferenceRecord>, TavolaError> {
    let user_key = user_key.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_key, area, cuisine, party_size, contact_address, updated_at
                 FROM preferences WHERE user_key = ?1",
            )?;
            let result = stmt.query_row(params![user_key], map_record);
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
