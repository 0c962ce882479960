// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the metal price pipeline

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Prices for one metal, keyed by purity/karat label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetalQuote {
    /// Label → price pairs in page order. Prices are kept exactly as the
    /// source formats them.
    #[serde(serialize_with = "serialize_ordered_map")]
    pub types: Vec<(String, String)>,
    /// Price unit, e.g. "INR/10g"
    pub unit: String,
    /// Label → session movement, for rows that carry change/high/low columns
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_ordered_map"
    )]
    pub market: Vec<(String, MarketMove)>,
}

/// Session movement columns of a commodity row, kept as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketMove {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<String>,
    /// When the row was scraped
    pub updated_at: DateTime<Utc>,
}

impl MarketMove {
    pub fn is_empty(&self) -> bool {
        self.change.is_none() && self.high.is_none() && self.low.is_none()
    }
}

impl MetalQuote {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            types: Vec::new(),
            unit: unit.into(),
            market: Vec::new(),
        }
    }

    /// Movement recorded for a label, if the row had one
    pub fn movement(&self, label: &str) -> Option<&MarketMove> {
        self.market
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, m)| m)
    }

    /// Look up the price recorded for a label
    pub fn price(&self, label: &str) -> Option<&str> {
        self.types
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| p.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Record a row; a repeated label keeps its first price.
    pub(crate) fn push(&mut self, label: String, price: String) -> bool {
        if self.types.iter().any(|(l, _)| *l == label) {
            return false;
        }
        self.types.push((label, price));
        true
    }

    /// Record a row together with its movement columns
    pub(crate) fn push_with_move(
        &mut self,
        label: String,
        price: String,
        movement: MarketMove,
    ) -> bool {
        if !self.push(label.clone(), price) {
            return false;
        }
        if !movement.is_empty() {
            self.market.push((label, movement));
        }
        true
    }
}

fn serialize_ordered_map<S, V>(pairs: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (label, price) in pairs {
        map.serialize_entry(label, price)?;
    }
    map.end()
}

/// One complete set of prices from a single scrape
///
/// Never mutated after construction; a refresh builds a new snapshot.
/// Serializes as the bare `{ metal: { types, unit } }` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSnapshot {
    metals: BTreeMap<String, MetalQuote>,
    fetched_at: DateTime<Utc>,
}

impl PriceSnapshot {
    /// Build a snapshot, dropping metals that matched no rows
    pub fn new(metals: BTreeMap<String, MetalQuote>, fetched_at: DateTime<Utc>) -> Self {
        let metals = metals
            .into_iter()
            .filter(|(_, quote)| !quote.is_empty())
            .collect();
        Self { metals, fetched_at }
    }

    pub fn metals(&self) -> &BTreeMap<String, MetalQuote> {
        &self.metals
    }

    /// Exact-key lookup; callers normalise the name first
    pub fn metal(&self, name: &str) -> Option<&MetalQuote> {
        self.metals.get(name)
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Total label/price rows across all metals
    pub fn row_count(&self) -> usize {
        self.metals.values().map(|q| q.types.len()).sum()
    }
}

impl Serialize for PriceSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.metals.serialize(serializer)
    }
}

/// Upstream fetch failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Request did not complete within the configured timeout
    #[error("Timeout fetching: {0}")]
    Timeout(String),

    /// Network, TLS or body read failure
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Upstream answered with a non-success status
    #[error("HTTP {0} for: {1}")]
    HttpStatus(u16, String),
}

/// The page no longer has the structure the rule set expects
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// None of the anchor selectors matched anything
    #[error("Price table not found (tried: {tried})")]
    AnchorNotFound {
        /// Comma separated list of selectors that were tried
        tried: String,
    },

    /// Anchor located but not a single row matched a metal label
    #[error("Price table found but no metal rows matched")]
    NoRowsMatched,
}

/// Why a refresh attempt produced no snapshot
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
