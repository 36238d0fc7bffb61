// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles intake, storage, search, and a mock notifier
//! around a temp SQLite database, seeded with a small restaurant set, so
//! tests can drive the real pipeline without external services.

use std::sync::Arc;

use chrono::FixedOffset;
use tempfile::TempDir;

use tavola_config::model::{SearchConfig, StorageConfig, WorkerConfig};
use tavola_core::{Cuisine, EntityRecord, SearchIndex, ServiceArea, StorageAdapter, TavolaError};
use tavola_intake::IntakeService;
use tavola_search::{SearchResolver, SqliteSearchIndex};
use tavola_storage::SqliteStorage;

/// Builder for a seeded test environment.
pub struct TestHarnessBuilder {
    seeds: Vec<EntityRecord>,
    rebuild_index: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            seeds: default_seeds(),
            rebuild_index: true,
        }
    }

    /// Replace the default seed set.
    pub fn with_seeds(mut self, seeds: Vec<EntityRecord>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Add a record on top of the current seed set.
    pub fn with_restaurant(mut self, record: EntityRecord) -> Self {
        self.seeds.push(record);
        self
    }

    /// Leave the candidate index empty to simulate index lag.
    pub fn without_index(mut self) -> Self {
        self.rebuild_index = false;
        self
    }

    pub async fn build(self) -> Result<TestHarness, TavolaError> {
        let temp_dir = TempDir::new().map_err(|e| TavolaError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db").to_string_lossy().into_owned();

        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path,
            wal_mode: true,
        }));
        storage.initialize().await?;

        for record in &self.seeds {
            storage.upsert_restaurant(record).await?;
        }

        let index = Arc::new(SqliteSearchIndex::new(storage.clone()));
        if self.rebuild_index {
            index.rebuild().await?;
        }

        let worker_config = WorkerConfig::default();
        let search_config = SearchConfig {
            primary_timeout_ms: 500,
            fallback_timeout_ms: 500,
        };
        let resolver = Arc::new(SearchResolver::new(
            index.clone(),
            storage.clone(),
            &search_config,
        ));

        let zone = FixedOffset::west_opt(5 * 3600)
            .ok_or_else(|| TavolaError::Internal("bad test offset".to_string()))?;
        let intake = IntakeService::new(storage.clone(), worker_config.queue_name.clone(), zone);

        Ok(TestHarness {
            storage,
            index,
            resolver,
            intake,
            worker_config,
            zone,
            _temp_dir: temp_dir,
        })
    }
}

pub struct TestHarness {
    pub storage: Arc<SqliteStorage>,
    pub index: Arc<SqliteSearchIndex>,
    pub resolver: Arc<SearchResolver>,
    pub intake: IntakeService,
    pub worker_config: WorkerConfig,
    pub zone: FixedOffset,
    _temp_dir: TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with the default Manhattan/Japanese-heavy seed set.
    pub async fn new() -> Result<Self, TavolaError> {
        Self::builder().build().await
    }
}

/// A realistic record with the given identity and classification.
pub fn restaurant(id: &str, cuisine: Cuisine, area: ServiceArea) -> EntityRecord {
    EntityRecord {
        entity_id: id.to_string(),
        name: format!("Test Restaurant {id}"),
        address: Some(format!("{id} Example Ave")),
        latitude: Some(40.72),
        longitude: Some(-73.98),
        review_count: 150,
        rating: 4.2,
        phone: Some("+1-212-555-0188".to_string()),
        cuisine,
        area,
        price_range: Some("$$".to_string()),
        categories: vec!["dinner".to_string()],
        inserted_at: String::new(),
    }
}

fn default_seeds() -> Vec<EntityRecord> {
    vec![
        restaurant("jp-man-1", Cuisine::Japanese, ServiceArea::Manhattan),
        restaurant("jp-man-2", Cuisine::Japanese, ServiceArea::Manhattan),
        restaurant("jp-man-3", Cuisine::Japanese, ServiceArea::Manhattan),
        restaurant("it-man-1", Cuisine::Italian, ServiceArea::Manhattan),
        restaurant("th-bk-1", Cuisine::Thai, ServiceArea::Brooklyn),
        restaurant("ko-qn-1", Cuisine::Korean, ServiceArea::Queens),
    ]
}
