// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Metal price endpoint handlers

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    Json,
};
use tracing::{debug, warn};

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::prices::{MetalQuote, PriceSnapshot};

/// Carries the RFC 3339 time the served snapshot was scraped
pub const FETCHED_AT_HEADER: &str = "x-prices-fetched-at";

/// GET /api/metals - All metals in the current snapshot
///
/// # Response
/// `{ "<metal>": { "types": { "<label>": "<price>" }, "unit": "<unit>" } }`
///
/// # Errors
/// - 503 Service Unavailable: no snapshot has ever been scraped
pub async fn get_all_handler(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<PriceSnapshot>), ApiError> {
    let snapshot = state.price_service.get_all().await.map_err(|e| {
        warn!("Metals request failed: {}", e);
        ApiError::from(e)
    })?;

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&snapshot.fetched_at().to_rfc3339()) {
        headers.insert(HeaderName::from_static(FETCHED_AT_HEADER), value);
    }

    Ok((headers, Json(PriceSnapshot::clone(&snapshot))))
}

/// GET /api/metals/:name - One metal, case-insensitive
///
/// # Errors
/// - 404 Not Found: `{ "error": "Metal not found" }`
/// - 503 Service Unavailable: no snapshot has ever been scraped
pub async fn get_one_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MetalQuote>, ApiError> {
    debug!("Metal request: {}", name);
    let quote = state.price_service.get_one(&name).await?;
    Ok(Json(quote))
}
