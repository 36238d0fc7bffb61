// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock search index with scripted results or forced failure.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tavola_core::{
    AdapterType, Cuisine, HealthStatus, PluginAdapter, SearchIndex, ServiceArea, TavolaError,
};

pub struct MockSearchIndex {
    results: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<bool>>,
}

impl MockSearchIndex {
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(false)),
        }
    }

    /// Entity ids the next queries should return, regardless of filter.
    pub async fn set_results(&self, ids: Vec<String>) {
        *self.results.lock().await = ids;
    }

    /// Force every query to fail, driving resolvers onto their fallback.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.lock().await = failing;
    }
}

impl Default for MockSearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockSearchIndex {
    fn name(&self) -> &str {
        "mock-index"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SearchIndex
    }

    async fn health_check(&self) -> Result<HealthStatus, TavolaError> {
        if *self.failing.lock().await {
            Ok(HealthStatus::Unhealthy("forced failure".to_string()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), TavolaError> {
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for MockSearchIndex {
    async fn query(
        &self,
        _cuisine: Cuisine,
        _area: ServiceArea,
        limit: usize,
    ) -> Result<Vec<String>, TavolaError> {
        if *self.failing.lock().await {
            return Err(TavolaError::Search {
                message: "mock index failure".to_string(),
                source: None,
            });
        }
        let results = self.results.lock().await;
        Ok(results.iter().take(limit).cloned().collect())
    }

    async fn rebuild(&self) -> Result<usize, TavolaError> {
        if *self.failing.lock().await {
            return Err(TavolaError::Search {
                message: "mock index failure".to_string(),
                source: None,
            });
        }
        Ok(self.results.lock().await.len())
    }
}
