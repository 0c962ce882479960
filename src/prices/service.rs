// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Price query service
//!
//! Public contract of the pipeline. Transport and parse failures stay inside
//! the cache; callers only ever see [`ServiceError`].

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::cache::{CacheRead, SnapshotCache, SnapshotCacheStats};
use super::config::RatesConfig;
use super::extractor::PriceExtractor;
use super::fetcher::{HttpFetcher, PageSource};
use super::types::{FetchError, MetalQuote, PriceSnapshot};

/// Errors surfaced to API callers
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// No snapshot has ever been obtained from the upstream page
    #[error("Price source unavailable: {reason}")]
    SourceUnavailable {
        /// Latest refresh failure
        reason: String,
    },

    /// The snapshot holds no prices for this metal
    #[error("Metal not found: {metal}")]
    NotFound {
        /// Normalised metal name that was requested
        metal: String,
    },
}

/// Answers price queries from the shared snapshot cache
#[derive(Clone)]
pub struct PriceService {
    cache: Arc<SnapshotCache>,
}

impl PriceService {
    pub fn new(cache: Arc<SnapshotCache>) -> Self {
        Self { cache }
    }

    /// Build the production pipeline: HTTP fetcher, default rules, configured window
    pub fn from_config(config: &RatesConfig) -> Result<Self, FetchError> {
        let source: Arc<dyn PageSource> = Arc::new(HttpFetcher::from_config(config)?);
        let cache = SnapshotCache::new(source, PriceExtractor::default(), config.cache_ttl());
        Ok(Self::new(Arc::new(cache)))
    }

    /// All metals in the current snapshot
    pub async fn get_all(&self) -> Result<Arc<PriceSnapshot>, ServiceError> {
        match self.cache.get_snapshot().await {
            CacheRead::Fresh(snapshot) | CacheRead::Stale(snapshot) => Ok(snapshot),
            CacheRead::Empty(e) => Err(ServiceError::SourceUnavailable {
                reason: e.to_string(),
            }),
        }
    }

    /// One metal, matched case-insensitively
    pub async fn get_one(&self, name: &str) -> Result<MetalQuote, ServiceError> {
        let snapshot = self.get_all().await?;
        let key = name.trim().to_lowercase();

        match snapshot.metal(&key) {
            Some(quote) if !quote.is_empty() => Ok(quote.clone()),
            _ => {
                debug!("Metal '{}' not in snapshot", key);
                Err(ServiceError::NotFound { metal: key })
            }
        }
    }

    pub fn cache_stats(&self) -> SnapshotCacheStats {
        self.cache.stats()
    }
}
