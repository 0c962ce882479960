// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Snapshot cache with lazy refresh
//!
//! Holds the latest [`PriceSnapshot`] for one freshness window. A read after
//! expiry fetches and extracts a new snapshot before answering. A failed
//! refresh keeps serving the previous snapshot.
//!
//! Two locks:
//! - `state` (std `RwLock`) is only held for short, non-async sections, so
//!   readers always see either the old or the new entry, never a mix.
//! - `refresh` (tokio `Mutex`) is held across the upstream fetch so at most
//!   one refresh is in flight. Callers queued behind it take that refresh's
//!   outcome instead of fetching again.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::extractor::PriceExtractor;
use super::fetcher::PageSource;
use super::types::{PriceSnapshot, RefreshError};

/// Outcome of a cache read
#[derive(Debug, Clone)]
pub enum CacheRead {
    /// Snapshot within the freshness window
    Fresh(Arc<PriceSnapshot>),
    /// Older snapshot served because the latest refresh failed
    Stale(Arc<PriceSnapshot>),
    /// No snapshot has ever been obtained; carries the latest failure
    Empty(RefreshError),
}

impl CacheRead {
    pub fn snapshot(&self) -> Option<&Arc<PriceSnapshot>> {
        match self {
            CacheRead::Fresh(s) | CacheRead::Stale(s) => Some(s),
            CacheRead::Empty(_) => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, CacheRead::Stale(_))
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct SnapshotCacheStats {
    /// Whether any snapshot is held
    pub has_snapshot: bool,
    /// Age of the held snapshot
    pub age: Option<Duration>,
    /// Whether the held snapshot is past the freshness window
    pub expired: bool,
    /// Refresh attempts since start
    pub attempts: u64,
    /// Failed refresh attempts since start
    pub failures: u64,
    /// Message of the most recent failure, cleared by a successful refresh
    pub last_error: Option<String>,
}

struct CacheEntry {
    snapshot: Arc<PriceSnapshot>,
    stored_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entry: Option<CacheEntry>,
    last_attempt: Option<Instant>,
    last_error: Option<RefreshError>,
    attempts: u64,
    failures: u64,
}

impl CacheState {
    /// Answer without refreshing, if the state allows it
    fn settled_read(&self, ttl: Duration) -> Option<CacheRead> {
        let entry = self.entry.as_ref()?;
        // Failed attempts also count, so a broken upstream is retried once
        // per window rather than on every query.
        let due = self
            .last_attempt
            .map_or(true, |at| at.elapsed() >= ttl);
        if due {
            return None;
        }
        if entry.stored_at.elapsed() < ttl {
            Some(CacheRead::Fresh(entry.snapshot.clone()))
        } else {
            Some(CacheRead::Stale(entry.snapshot.clone()))
        }
    }

    /// Outcome of the most recent attempt, for callers that waited on it
    fn latest_outcome(&self) -> Option<CacheRead> {
        match (&self.entry, &self.last_error) {
            (Some(entry), None) => Some(CacheRead::Fresh(entry.snapshot.clone())),
            (Some(entry), Some(_)) => Some(CacheRead::Stale(entry.snapshot.clone())),
            (None, Some(e)) => Some(CacheRead::Empty(e.clone())),
            (None, None) => None,
        }
    }
}

/// Process-wide price snapshot cache
pub struct SnapshotCache {
    source: Arc<dyn PageSource>,
    extractor: PriceExtractor,
    ttl: Duration,
    state: RwLock<CacheState>,
    refresh: Mutex<()>,
}

impl SnapshotCache {
    /// Create an empty cache
    ///
    /// # Arguments
    /// * `source` - Where raw markup comes from
    /// * `extractor` - Turns markup into snapshots
    /// * `ttl` - Freshness window; zero refreshes on every read
    pub fn new(source: Arc<dyn PageSource>, extractor: PriceExtractor, ttl: Duration) -> Self {
        Self {
            source,
            extractor,
            ttl,
            state: RwLock::new(CacheState::default()),
            refresh: Mutex::new(()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current snapshot, refreshing first if the window has passed
    pub async fn get_snapshot(&self) -> CacheRead {
        let seen_attempts = {
            let state = self.read_state();
            if let Some(read) = state.settled_read(self.ttl) {
                debug!("Snapshot cache hit (stale: {})", read.is_stale());
                return read;
            }
            state.attempts
        };

        let _refreshing = self.refresh.lock().await;

        {
            let state = self.read_state();
            if state.attempts != seen_attempts {
                if let Some(read) = state.latest_outcome() {
                    debug!("Using refresh completed while waiting");
                    return read;
                }
            }
        }

        let start = Instant::now();
        let result = self.refresh_once().await;

        let mut state = self.write_state();
        state.attempts += 1;
        state.last_attempt = Some(Instant::now());

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                state.entry = Some(CacheEntry {
                    snapshot: snapshot.clone(),
                    stored_at: Instant::now(),
                });
                state.last_error = None;
                info!(
                    "Snapshot refreshed from {}: {} metals in {}ms",
                    self.source.name(),
                    snapshot.metals().len(),
                    start.elapsed().as_millis()
                );
                CacheRead::Fresh(snapshot)
            }
            Err(e) => {
                state.failures += 1;
                state.last_error = Some(e.clone());
                match &state.entry {
                    Some(entry) => {
                        warn!("Refresh failed, serving previous snapshot: {}", e);
                        CacheRead::Stale(entry.snapshot.clone())
                    }
                    None => {
                        error!("Refresh failed with no snapshot to fall back on: {}", e);
                        CacheRead::Empty(e)
                    }
                }
            }
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> SnapshotCacheStats {
        let state = self.read_state();
        let age = state.entry.as_ref().map(|e| e.stored_at.elapsed());
        SnapshotCacheStats {
            has_snapshot: state.entry.is_some(),
            age,
            expired: age.map_or(false, |a| a >= self.ttl),
            attempts: state.attempts,
            failures: state.failures,
            last_error: state.last_error.as_ref().map(|e| e.to_string()),
        }
    }

    async fn refresh_once(&self) -> Result<PriceSnapshot, RefreshError> {
        let html = self.source.fetch().await?;
        let snapshot = self.extractor.extract(&html)?;
        Ok(snapshot)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}
