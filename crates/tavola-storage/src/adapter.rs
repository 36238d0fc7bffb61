// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use tavola_config::model::StorageConfig;
use tavola_core::types::{
    Cuisine, DeadLetter, EntityRecord, PreferenceRecord, QueueEntry, RequestId, ServiceArea,
    UserKey,
};
use tavola_core::{
    AdapterType, HealthStatus, PluginAdapter, QueueStats, StorageAdapter, TavolaError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    pub fn db(&self) -> Result<&Database, TavolaError> {
        self.db.get().ok_or_else(|| TavolaError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TavolaError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TavolaError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), TavolaError> {
        let path = self.config.database_path.clone();
        let db = Database::open(&path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| TavolaError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), TavolaError> {
        let db = self.db()?;
        // Checkpoint WAL before close.
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Request queue ---

    async fn enqueue(&self, queue_name: &str, payload: &str) -> Result<i64, TavolaError> {
        queries::queue::enqueue(self.db()?, queue_name, payload).await
    }

    async fn poll(
        &self,
        queue_name: &str,
        max_messages: usize,
        visibility_timeout_secs: u64,
    ) -> Result<Vec<QueueEntry>, TavolaError> {
        queries::queue::poll(self.db()?, queue_name, max_messages, visibility_timeout_secs).await
    }

    async fn ack(&self, id: i64) -> Result<(), TavolaError> {
        queries::queue::ack(self.db()?, id).await
    }

    async fn release(&self, id: i64) -> Result<(), TavolaError> {
        queries::queue::release(self.db()?, id).await
    }

    // --- Dead-letter sink ---

    async fn dead_letter(&self, entry: &QueueEntry, reason: &str) -> Result<(), TavolaError> {
        queries::dead_letter::bury(self.db()?, entry, reason).await
    }

    async fn list_dead_letters(&self, limit: i64) -> Result<Vec<DeadLetter>, TavolaError> {
        queries::dead_letter::list(self.db()?, limit.max(0) as usize).await
    }

    // --- Preference store ---

    async fn upsert_preference(&self, record: &PreferenceRecord) -> Result<(), TavolaError> {
        queries::preferences::upsert(self.db()?, record).await
    }

    async fn get_preference(
        &self,
        user_key: &UserKey,
    ) -> Result<Option<PreferenceRecord>, TavolaError> {
        queries::preferences::get(self.db()?, user_key).await
    }

    // --- Primary store (restaurants) ---

    async fn get_restaurants(
        &self,
        entity_ids: &[String],
    ) -> Result<Vec<EntityRecord>, TavolaError> {
        queries::restaurants::get_many(self.db()?, entity_ids).await
    }

    async fn scan_candidates(
        &self,
        cuisine: Cuisine,
        area: ServiceArea,
    ) -> Result<Vec<String>, TavolaError> {
        queries::restaurants::scan_candidates(self.db()?, cuisine, area).await
    }

    async fn upsert_restaurant(&self, record: &EntityRecord) -> Result<(), TavolaError> {
        queries::restaurants::upsert(self.db()?, record).await
    }

    // --- Notification markers ---

    async fn mark_notified(
        &self,
        request_id: &RequestId,
        contact_address: &str,
    ) -> Result<bool, TavolaError> {
        queries::notifications::mark(self.db()?, request_id, contact_address).await
    }

    async fn was_notified(&self, request_id: &RequestId) -> Result<bool, TavolaError> {
        queries::notifications::exists(self.db()?, request_id).await
    }

    // --- Monitoring ---

    async fn queue_stats(&self, queue_name: &str) -> Result<QueueStats, TavolaError> {
        let db = self.db()?;
        Ok(QueueStats {
            pending: queries::queue::count_by_status(db, queue_name, "pending").await?,
            processing: queries::queue::count_by_status(db, queue_name, "processing").await?,
            completed: queries::queue::count_by_status(db, queue_name, "completed").await?,
            dead_lettered: queries::dead_letter::count(db).await?,
            notified: queries::notifications::count(db).await?,
        })
    }
}
