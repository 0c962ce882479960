// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use metal_rates::{api::start_server, version, PriceService, RatesConfig};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting {}", version::get_version_string());
    tracing::info!("Features: {}", version::FEATURES.join(", "));

    let config = RatesConfig::from_env();
    config.validate().map_err(|e| anyhow!("invalid configuration: {}", e))?;
    tracing::info!(
        "Scraping {} (timeout {}s, cache window {}s)",
        config.source_url,
        config.fetch_timeout_secs,
        config.cache_ttl_secs
    );

    let price_service = PriceService::from_config(&config)?;

    start_server(price_service, &config.api_host, config.api_port).await
}
