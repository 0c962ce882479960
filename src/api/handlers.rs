// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::http_server::AppState;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub features: Vec<String>,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub has_snapshot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_age_secs: Option<u64>,
    pub refresh_attempts: u64,
    pub refresh_failures: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

/// GET / - Service banner and endpoint list
pub async fn status_handler() -> Json<StatusResponse> {
    let endpoints = [
        ("/api/metals", "Get all metals"),
        ("/api/metals/<name>", "Get a specific metal"),
        ("/health", "Cache and upstream health"),
    ]
    .iter()
    .map(|(path, what)| (path.to_string(), what.to_string()))
    .collect();

    Json(StatusResponse {
        status: "Metal Rates API Running".to_string(),
        version: version::VERSION.to_string(),
        features: version::FEATURES.iter().map(|f| f.to_string()).collect(),
        endpoints,
    })
}

/// GET /health - Cache state without triggering a refresh
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.price_service.cache_stats();

    let mut issues = Vec::new();
    if let Some(error) = &stats.last_error {
        issues.push(format!("last refresh failed: {}", error));
    }
    if stats.expired {
        issues.push("snapshot is past its freshness window".to_string());
    }

    let status = match (stats.has_snapshot, issues.is_empty()) {
        (true, true) => "healthy",
        (true, false) => "degraded",
        (false, _) if stats.attempts == 0 => "starting",
        (false, _) => "unavailable",
    };

    Json(HealthResponse {
        status: status.to_string(),
        has_snapshot: stats.has_snapshot,
        snapshot_age_secs: stats.age.map(|a| a.as_secs()),
        refresh_attempts: stats.attempts,
        refresh_failures: stats.failures,
        issues: (!issues.is_empty()).then_some(issues),
    })
}
