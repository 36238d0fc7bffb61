// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search index trait for the candidate index behind the search resolver.

use async_trait::async_trait;

use crate::error::TavolaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Cuisine, ServiceArea};

/// Adapter for the lightweight candidate index.
///
/// The index holds only `{entity_id, cuisine, area}` projections and is
/// always subordinate to the primary store: it can be rebuilt from it at any
/// time and its results are never used for display data.
#[async_trait]
pub trait SearchIndex: PluginAdapter {
    /// Query up to `limit` entity ids matching cuisine and area, ranked by a
    /// randomized scoring function so repeated identical requests surface
    /// varied results. Fewer than `limit` matches returns all of them.
    async fn query(
        &self,
        cuisine: Cuisine,
        area: ServiceArea,
        limit: usize,
    ) -> Result<Vec<String>, TavolaError>;

    /// Repopulate the index from the primary store. Returns the number of
    /// candidate entries indexed.
    async fn rebuild(&self) -> Result<usize, TavolaError>;
}
