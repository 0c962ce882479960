// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod prices;
pub mod version;

pub use prices::{
    CacheRead, ExtractionRules, MarketMove, MetalQuote, MetalRule, PriceExtractor, PriceService,
    PriceSnapshot, RatesConfig, ServiceError, SnapshotCache,
};
