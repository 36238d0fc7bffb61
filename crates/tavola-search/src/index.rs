// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the SearchIndex trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use tavola_core::{AdapterType, Cuisine, HealthStatus, PluginAdapter, SearchIndex, ServiceArea, TavolaError};
use tavola_storage::queries::search_index;
use tavola_storage::SqliteStorage;

/// Candidate index backed by the `search_index` table.
///
/// Shares the storage adapter's database handle; the index lives beside the
/// primary store so `rebuild` is a single SQL statement.
pub struct SqliteSearchIndex {
    storage: Arc<SqliteStorage>,
}

impl SqliteSearchIndex {
    pub fn new(storage: Arc<SqliteStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl PluginAdapter for SqliteSearchIndex {
    fn name(&self) -> &str {
        "sqlite-index"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SearchIndex
    }

    async fn health_check(&self) -> Result<HealthStatus, TavolaError> {
        // The index is healthy whenever its backing store is.
        self.storage.health_check().await
    }

    async fn shutdown(&self) -> Result<(), TavolaError> {
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for SqliteSearchIndex {
    async fn query(
        &self,
        cuisine: Cuisine,
        area: ServiceArea,
        limit: usize,
    ) -> Result<Vec<String>, TavolaError> {
        let ids = search_index::query_random(self.storage.db()?, cuisine, area, limit)
            .await
            .map_err(|e| TavolaError::Search {
                message: "candidate index query failed".to_string(),
                source: Some(Box::new(e)),
            })?;
        debug!(%cuisine, %area, hits = ids.len(), "index query");
        Ok(ids)
    }

    async fn rebuild(&self) -> Result<usize, TavolaError> {
        let indexed = search_index::rebuild(self.storage.db()?).await?;
        info!(indexed, "candidate index rebuilt");
        Ok(indexed)
    }
}
