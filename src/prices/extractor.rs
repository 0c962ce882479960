// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML price table extraction
//!
//! Locates the price table through the anchor selectors of an
//! [`ExtractionRules`] set and reads label/price rows out of it. Header rows
//! decide which column holds the price; commodity rows with five or more
//! cells also yield change/high/low.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::rules::{
    cell_value, clean_text, latest_value, normalize_label, unit_from_header, ColumnLayout,
    ExtractionRules,
};
use super::types::{ExtractError, MarketMove, MetalQuote, PriceSnapshot};

/// Turns raw markup into a [`PriceSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct PriceExtractor {
    rules: ExtractionRules,
}

/// Metal and unit announced by the most recent section header
struct Section {
    metal: String,
    unit: Option<String>,
}

impl PriceExtractor {
    pub fn new(rules: ExtractionRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    /// Extract every matching price row
    ///
    /// Rows that match no metal, or whose price cell holds no number, are
    /// skipped. Fails only when the anchor is missing or no row at all matched.
    pub fn extract(&self, html: &str) -> Result<PriceSnapshot, ExtractError> {
        let document = Html::parse_document(html);

        let anchors = self.locate_anchors(&document);
        if anchors.is_empty() {
            return Err(ExtractError::AnchorNotFound {
                tried: self.rules.anchors.join(", "),
            });
        }

        let fetched_at = Utc::now();
        let mut metals: BTreeMap<String, MetalQuote> = BTreeMap::new();
        for anchor in &anchors {
            self.extract_table(anchor, fetched_at, &mut metals);
        }

        let snapshot = PriceSnapshot::new(metals, fetched_at);
        if snapshot.metals().is_empty() {
            return Err(ExtractError::NoRowsMatched);
        }

        info!(
            "Extraction done. Metals: {}, records: {}",
            snapshot.metals().len(),
            snapshot.row_count()
        );
        Ok(snapshot)
    }

    /// Elements matched by the first anchor selector that matches anything
    fn locate_anchors<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for selector_str in &self.rules.anchors {
            let Ok(selector) = Selector::parse(selector_str) else {
                debug!("Skipping unparsable anchor selector: {}", selector_str);
                continue;
            };
            let found: Vec<_> = document.select(&selector).collect();
            if !found.is_empty() {
                debug!("Anchor '{}' matched {} element(s)", selector_str, found.len());
                return found;
            }
        }
        Vec::new()
    }

    fn extract_table(
        &self,
        table: &ElementRef,
        fetched_at: DateTime<Utc>,
        metals: &mut BTreeMap<String, MetalQuote>,
    ) {
        let (Ok(rows), Ok(cells), Ok(caption)) = (
            Selector::parse("tr"),
            Selector::parse("th, td"),
            Selector::parse("caption"),
        ) else {
            return;
        };

        let mut section = table
            .select(&caption)
            .next()
            .and_then(|c| self.section_from_header(&element_text(&c)));
        // None until a header row names the price column
        let mut layout: Option<ColumnLayout> = None;

        for row in table.select(&rows) {
            let cols: Vec<String> = row
                .select(&cells)
                .map(|c| clean_text(&element_text(&c)))
                .collect();
            if cols.is_empty() {
                continue;
            }

            let is_header = row.select(&cells).all(|c| c.value().name() == "th");
            if is_header {
                if let Some(next) = self.section_from_header(&cols.join(" ")) {
                    section = Some(next);
                }
                if let Some(next) = self.rules.columns.layout(&cols) {
                    layout = Some(next);
                }
                continue;
            }

            if cols.len() < 2 {
                continue;
            }

            let label = normalize_label(&cols[0]);
            if label.is_empty() {
                continue;
            }
            let Some(rule) = self.rules.metal_for_label(&label) else {
                // Some pages spell their header row with <td>
                if let Some(next) = self.rules.columns.layout(&cols) {
                    debug!("Column header row: {:?}", next);
                    layout = Some(next);
                } else {
                    debug!("Row skipped, no metal matches label '{}'", label);
                }
                continue;
            };

            let columns = match layout {
                Some(layout) => layout,
                None if cols.len() >= 5 => ColumnLayout::COMMODITY,
                None => ColumnLayout::default(),
            };
            let Some(price) = cols.get(columns.price).and_then(|c| latest_value(c)) else {
                debug!("Row skipped, no price for '{}'", label);
                continue;
            };

            let unit = section
                .as_ref()
                .filter(|s| s.metal == rule.name)
                .and_then(|s| s.unit.clone())
                .unwrap_or_else(|| rule.default_unit.clone());
            let quote = metals
                .entry(rule.name.clone())
                .or_insert_with(|| MetalQuote::new(unit));

            if columns.has_movement() {
                let column = |index: Option<usize>| {
                    index.and_then(|i| cols.get(i)).and_then(|c| cell_value(c))
                };
                let movement = MarketMove {
                    change: column(columns.change),
                    high: column(columns.high),
                    low: column(columns.low),
                    updated_at: fetched_at,
                };
                quote.push_with_move(label, price, movement);
            } else {
                quote.push(label, price);
            }
        }
    }

    fn section_from_header(&self, header: &str) -> Option<Section> {
        let rule = self.rules.metal_for_section(header)?;
        Some(Section {
            metal: rule.name.clone(),
            unit: unit_from_header(header),
        })
    }
}

/// Extract text from an HTML element, stripping tags
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}
