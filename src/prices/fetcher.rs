// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upstream page fetching
//!
//! One GET per call with a bounded timeout. No retries here; the cache
//! decides when to try again.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::config::RatesConfig;
use super::types::FetchError;

/// Source of raw price page markup
///
/// Implemented by [`HttpFetcher`] in production and by counting doubles in tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the raw page markup
    async fn fetch(&self) -> Result<String, FetchError>;

    /// Identifier for logging (usually the URL)
    fn name(&self) -> &str;
}

/// Fetches the price page over HTTP(S)
pub struct HttpFetcher {
    client: Client,
    url: String,
}

impl HttpFetcher {
    /// Create a fetcher for `url` with a browser-like header set
    pub fn new(url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-IN,en;q=0.9"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::ConnectionFailed(format!("HTTP client setup: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &RatesConfig) -> Result<Self, FetchError> {
        Self::new(
            config.source_url.clone(),
            &config.user_agent,
            config.fetch_timeout(),
        )
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.url.clone())
        } else {
            FetchError::ConnectionFailed(e.to_string())
        }
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        debug!("Fetching price page: {}", self.url);
        let start = Instant::now();

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16(), self.url.clone()));
        }

        let html = response.text().await.map_err(|e| self.classify(e))?;

        info!(
            "Fetched {} bytes from {} in {}ms",
            html.len(),
            self.url,
            start.elapsed().as_millis()
        );
        Ok(html)
    }

    fn name(&self) -> &str {
        &self.url
    }
}
