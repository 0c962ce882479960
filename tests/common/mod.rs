// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// tests/common/mod.rs - Shared upstream test double
#![allow(dead_code)]

use async_trait::async_trait;
use metal_rates::prices::{FetchError, PageSource, PriceExtractor, PriceService, SnapshotCache};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GOLD_PAGE: &str = r#"
    <html>
    <body>
        <h1>Today's Rates</h1>
        <table class="gold_silver_table">
            <tr><th>Gold</th><th>Price (INR/10g)</th></tr>
            <tr><td>Gold 24 Karat</td><td>15526</td></tr>
            <tr><td>Gold 22 Karat</td><td>14232</td></tr>
        </table>
    </body>
    </html>
"#;

pub const GOLD_SILVER_PAGE: &str = r#"
    <table class="gold_silver_table">
        <tr><th>Gold</th><th>Price (INR/10g)</th></tr>
        <tr><td>Gold 24 Karat</td><td>15610</td></tr>
        <tr><th>Silver</th><th>Price (INR/kg)</th></tr>
        <tr><td>Silver 999</td><td>1,92,000</td></tr>
    </table>
"#;

/// Upstream stand-in that counts fetches and can be switched at runtime
pub struct CountingSource {
    calls: AtomicUsize,
    response: Mutex<Result<String, FetchError>>,
    delay: Duration,
}

impl CountingSource {
    pub fn serving(body: &str) -> Arc<Self> {
        Self::with_delay(body, Duration::ZERO)
    }

    pub fn with_delay(body: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Mutex::new(Ok(body.to_string())),
            delay,
        })
    }

    pub fn failing(error: FetchError) -> Arc<Self> {
        let source = Self::serving("");
        source.set_response(Err(error));
        source
    }

    pub fn set_response(&self, response: Result<String, FetchError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for CountingSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.lock().unwrap().clone()
    }

    fn name(&self) -> &str {
        "counting-source"
    }
}

/// Service over `source` with the default extraction rules
pub fn service_over(source: Arc<CountingSource>, ttl: Duration) -> PriceService {
    let cache = SnapshotCache::new(source, PriceExtractor::default(), ttl);
    PriceService::new(Arc::new(cache))
}
