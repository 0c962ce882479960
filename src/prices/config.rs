// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the price scraper and API
//!
//! Defines the upstream source, HTTP fetch settings, and cache freshness.

use std::env;
use std::time::Duration;
use url::Url;

/// Upstream page listing the prices
pub const DEFAULT_SOURCE_URL: &str =
    "https://commoditiescontrol.com/eagritrader/revamp/long_short_details.php";

/// Desktop browser signature; the upstream rejects default client agents
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Configuration for the metal rates service
#[derive(Debug, Clone)]
pub struct RatesConfig {
    /// Page to scrape
    pub source_url: String,
    /// User-Agent header sent upstream
    pub user_agent: String,
    /// Timeout for one upstream fetch in seconds (default: 10)
    pub fetch_timeout_secs: u64,
    /// Freshness window in seconds (default: 180)
    pub cache_ttl_secs: u64,
    /// Address the HTTP API binds to (default: 0.0.0.0)
    pub api_host: String,
    /// Port the HTTP API binds to (default: 5000)
    pub api_port: u16,
}

impl RatesConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            source_url: env::var("METAL_RATES_SOURCE_URL").unwrap_or(defaults.source_url),
            user_agent: env::var("METAL_RATES_USER_AGENT").unwrap_or(defaults.user_agent),
            fetch_timeout_secs: env::var("METAL_RATES_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs)
                .clamp(1, 30),
            cache_ttl_secs: env::var("METAL_RATES_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            api_host: env::var("API_HOST").unwrap_or(defaults.api_host),
            api_port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.api_port),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.source_url)
            .map_err(|e| format!("source_url is not a valid URL: {}", e))?;
        if !["http", "https"].contains(&url.scheme()) {
            return Err("source_url must use http or https".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent cannot be empty".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_secs: 10,
            cache_ttl_secs: 180,
            api_host: "0.0.0.0".to_string(),
            api_port: 5000,
        }
    }
}
