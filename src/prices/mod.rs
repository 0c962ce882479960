// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Precious metal price pipeline
//!
//! Scrapes a third-party HTML page listing metal prices and serves a typed,
//! cached snapshot of it.
//!
//! ## Architecture
//!
//! ```text
//! HttpFetcher → HTML → PriceExtractor (ExtractionRules) → PriceSnapshot
//!                                                              ↓
//!                          PriceService ← SnapshotCache (180s window)
//! ```
//!
//! Failures after a first successful scrape are absorbed by the cache, which
//! keeps serving the previous snapshot.
//!
//! ## Usage
//!
//! ```ignore
//! let config = RatesConfig::from_env();
//! let service = PriceService::from_config(&config)?;
//!
//! let gold = service.get_one("Gold").await?;
//! ```

pub mod cache;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod rules;
pub mod service;
pub mod types;

pub use cache::{CacheRead, SnapshotCache, SnapshotCacheStats};
pub use config::RatesConfig;
pub use extractor::PriceExtractor;
pub use fetcher::{HttpFetcher, PageSource};
pub use rules::{ColumnLayout, ColumnRules, ExtractionRules, MetalRule};
pub use service::{PriceService, ServiceError};
pub use types::{
    ExtractError, FetchError, MarketMove, MetalQuote, PriceSnapshot, RefreshError,
};
