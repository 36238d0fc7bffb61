// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate resolution with a primary index and a primary-store fallback.
//!
//! The primary path queries the candidate index with randomized ranking. If
//! it fails, times out, or comes back empty, the resolver falls back to a
//! deterministic scan of the primary store plus a client-side uniform
//! sample. A primary failure is never surfaced to the caller; only both
//! paths failing yields an error, and that error is transient.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{debug, warn};

use tavola_config::model::SearchConfig;
use tavola_core::{Cuisine, SearchIndex, ServiceArea, StorageAdapter, TavolaError};

pub struct SearchResolver {
    index: Arc<dyn SearchIndex>,
    storage: Arc<dyn StorageAdapter>,
    primary_timeout: Duration,
    fallback_timeout: Duration,
}

impl SearchResolver {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        storage: Arc<dyn StorageAdapter>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            index,
            storage,
            primary_timeout: Duration::from_millis(config.primary_timeout_ms),
            fallback_timeout: Duration::from_millis(config.fallback_timeout_ms),
        }
    }

    /// Resolve up to `sample_size` candidate entity ids.
    ///
    /// An empty result means the area/cuisine combination genuinely has no
    /// matches in the primary store; unavailability of both paths is
    /// reported as [`TavolaError::SearchUnavailable`] instead.
    pub async fn resolve(
        &self,
        cuisine: Cuisine,
        area: ServiceArea,
        sample_size: usize,
    ) -> Result<Vec<String>, TavolaError> {
        match tokio::time::timeout(
            self.primary_timeout,
            self.index.query(cuisine, area, sample_size),
        )
        .await
        {
            Ok(Ok(ids)) if !ids.is_empty() => return Ok(ids),
            Ok(Ok(_)) => {
                // Could be real absence or index lag; the primary store decides.
                debug!(%cuisine, %area, "primary index empty, falling back");
            }
            Ok(Err(e)) => {
                warn!(%cuisine, %area, error = %e, "primary index failed, falling back");
            }
            Err(_) => {
                warn!(%cuisine, %area, timeout_ms = self.primary_timeout.as_millis() as u64,
                      "primary index timed out, falling back");
            }
        }

        match tokio::time::timeout(
            self.fallback_timeout,
            self.storage.scan_candidates(cuisine, area),
        )
        .await
        {
            Ok(Ok(candidates)) => {
                let sampled = sample(candidates, sample_size);
                debug!(%cuisine, %area, hits = sampled.len(), "fallback scan");
                Ok(sampled)
            }
            Ok(Err(e)) => {
                warn!(%cuisine, %area, error = %e, "fallback scan failed");
                Err(TavolaError::SearchUnavailable {
                    message: format!("both search paths failed for {cuisine}/{area}"),
                })
            }
            Err(_) => Err(TavolaError::SearchUnavailable {
                message: format!(
                    "fallback scan timed out after {}ms for {cuisine}/{area}",
                    self.fallback_timeout.as_millis()
                ),
            }),
        }
    }
}

fn sample(mut candidates: Vec<String>, sample_size: usize) -> Vec<String> {
    if candidates.len() <= sample_size {
        return candidates;
    }
    candidates.shuffle(&mut rand::thread_rng());
    candidates.truncate(sample_size);
    candidates
}
