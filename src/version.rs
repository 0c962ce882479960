// Version information for the Metal Rates service

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-stale-serving-cache-2026-10-17";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-17";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "html-price-extraction",
    "karat-and-fineness-labels",
    "section-units",
    "header-price-columns",
    "commodity-market-columns",
    "snapshot-cache",
    "stale-on-error",
    "single-flight-refresh",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Metal Rates {} ({})", VERSION_NUMBER, BUILD_DATE)
}
