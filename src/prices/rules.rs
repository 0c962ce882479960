// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Declarative extraction rules
//!
//! The extractor walks the page using this data only:
//! anchor selectors → section headers → row label patterns → value columns.
//! Adjusting for layout drift means editing rules, not traversal code.

use regex::Regex;
use std::sync::OnceLock;

/// How to recognise the rows belonging to one metal
#[derive(Debug, Clone)]
pub struct MetalRule {
    /// Key used in the snapshot, lowercase (e.g. "gold")
    pub name: String,
    /// Matched against the cleaned, lowercased row label
    pub label_pattern: Regex,
    /// Detects a section header naming this metal
    pub section_pattern: Regex,
    /// Unit used when no section header supplies one
    pub default_unit: String,
}

impl MetalRule {
    /// Rule accepting "<metal>", "<metal> <N> karat" (k/kt/carat) and
    /// "<metal> <fineness>" labels
    pub fn new(name: &str, default_unit: &str) -> Result<Self, regex::Error> {
        let name = name.trim().to_lowercase();
        let escaped = regex::escape(&name);
        let label_pattern = Regex::new(&format!(
            r"^{escaped}(?:\s+(?:\d{{1,2}}\s*(?:k|kt|karat|carat)|\d{{3,4}}(?:\s*fine)?))?$"
        ))?;
        Self::with_pattern(&name, label_pattern, default_unit)
    }

    /// Rule with a custom label pattern
    pub fn with_pattern(
        name: &str,
        label_pattern: Regex,
        default_unit: &str,
    ) -> Result<Self, regex::Error> {
        let name = name.trim().to_lowercase();
        let section_pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&name)))?;
        Ok(Self {
            name,
            label_pattern,
            section_pattern,
            default_unit: default_unit.to_string(),
        })
    }

    pub fn matches_label(&self, label: &str) -> bool {
        self.label_pattern.is_match(label)
    }

    pub fn names_section(&self, header: &str) -> bool {
        self.section_pattern.is_match(header)
    }
}

/// Header patterns locating the value columns of a table
///
/// Matched case-insensitively against header cells after the label column.
#[derive(Debug, Clone)]
pub struct ColumnRules {
    pub price: Regex,
    pub change: Regex,
    pub high: Regex,
    pub low: Regex,
}

/// Column indices in effect for the rows of one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub price: usize,
    pub change: Option<usize>,
    pub high: Option<usize>,
    pub low: Option<usize>,
}

impl ColumnLayout {
    /// Label, Price, Change, High, Low
    pub const COMMODITY: Self = Self {
        price: 1,
        change: Some(2),
        high: Some(3),
        low: Some(4),
    };

    pub fn has_movement(&self) -> bool {
        self.change.is_some() || self.high.is_some() || self.low.is_some()
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            price: 1,
            change: None,
            high: None,
            low: None,
        }
    }
}

impl ColumnRules {
    /// Layout announced by a header row, or None when no cell names a price
    pub fn layout(&self, headers: &[String]) -> Option<ColumnLayout> {
        let find = |pattern: &Regex, skip: Option<usize>| {
            headers
                .iter()
                .enumerate()
                .skip(1)
                .find(|(i, h)| Some(*i) != skip && pattern.is_match(h))
                .map(|(i, _)| i)
        };

        let price = find(&self.price, None)?;
        Some(ColumnLayout {
            price,
            change: find(&self.change, Some(price)),
            high: find(&self.high, Some(price)),
            low: find(&self.low, Some(price)),
        })
    }
}

impl Default for ColumnRules {
    fn default() -> Self {
        let pattern = |p: &str| Regex::new(p).expect("static pattern");
        Self {
            price: pattern(r"(?i)\b(?:price|rate|ltp)\b"),
            change: pattern(r"(?i)\b(?:change|chg)\b"),
            high: pattern(r"(?i)\bhigh\b"),
            low: pattern(r"(?i)\blow\b"),
        }
    }
}

/// Complete rule set for one upstream page
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    /// CSS selectors tried in order; the first one matching anything wins
    pub anchors: Vec<String>,
    /// Metals of interest
    pub metals: Vec<MetalRule>,
    /// Value column detection
    pub columns: ColumnRules,
}

impl ExtractionRules {
    pub fn new(anchors: Vec<String>, metals: Vec<MetalRule>) -> Self {
        Self {
            anchors,
            metals,
            columns: ColumnRules::default(),
        }
    }

    pub fn with_columns(mut self, columns: ColumnRules) -> Self {
        self.columns = columns;
        self
    }

    /// First metal whose label pattern accepts `label`
    pub fn metal_for_label(&self, label: &str) -> Option<&MetalRule> {
        self.metals.iter().find(|m| m.matches_label(label))
    }

    /// First metal named by a section header
    pub fn metal_for_section(&self, header: &str) -> Option<&MetalRule> {
        self.metals.iter().find(|m| m.names_section(header))
    }
}

impl Default for ExtractionRules {
    fn default() -> Self {
        let anchors = [
            "table.gold_silver_table",
            "table.metal-rates",
            "#metal-rates table",
            "table",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        // Literal names cannot produce an invalid pattern
        let metals = [("gold", "INR/10g"), ("silver", "INR/kg"), ("copper", "INR/kg")]
            .iter()
            .filter_map(|(name, unit)| MetalRule::new(name, unit).ok())
            .collect();

        Self::new(anchors, metals)
    }
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

fn expiry_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+exp:.*$").expect("static pattern"))
}

fn unit_in_parens() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(\s*([^()/]{1,8}?\s*/\s*[^()]{1,12}?)\s*\)").expect("static pattern"))
}

/// Collapse runs of whitespace and trim
pub fn clean_text(text: &str) -> String {
    whitespace().replace_all(text, " ").trim().to_string()
}

/// Normalise a row label: cleaned, lowercased, contract expiry removed
///
/// `"Gold  EXP: Feb-26"` becomes `"gold"`.
pub fn normalize_label(text: &str) -> String {
    let cleaned = clean_text(text).to_lowercase();
    expiry_suffix().replace(&cleaned, "").trim().to_string()
}

/// First token of a cell that carries a digit, kept verbatim
///
/// `"+3.15 (0.4%)"` gives `"+3.15"`; `"--"` gives None.
pub fn cell_value(text: &str) -> Option<String> {
    text.split_whitespace()
        .find(|token| token.chars().any(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

/// Current price from a cell that may list several values
///
/// Takes the first numeric token and drops a currency prefix glued to it:
/// `"₹ 15,526"`, `"Rs.14,232"` and `"312.2 307.3"` give `"15,526"`,
/// `"14,232"` and `"312.2"`.
pub fn latest_value(text: &str) -> Option<String> {
    let token = cell_value(text)?;
    Some(
        token
            .trim_start_matches(|c: char| !c.is_ascii_digit())
            .to_string(),
    )
}

/// Unit named in parentheses in a header, e.g. "Gold Rate (INR/10g)"
pub fn unit_from_header(text: &str) -> Option<String> {
    let caps = unit_in_parens().captures(text)?;
    let unit: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
    Some(unit)
}
