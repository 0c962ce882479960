// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, status_handler};
use super::metals::{get_all_handler, get_one_handler};
use crate::prices::PriceService;

#[derive(Clone)]
pub struct AppState {
    pub price_service: PriceService,
}

/// Build the API router around a price service
pub fn router(price_service: PriceService) -> Router {
    let state = AppState { price_service };

    Router::new()
        // Banner
        .route("/", get(status_handler))
        // Health check
        .route("/health", get(health_handler))
        // Metal prices
        .route("/api/metals", get(get_all_handler))
        .route("/api/metals/:name", get(get_one_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the API listener; `host` may be a hostname such as "localhost"
pub async fn bind_listener(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind((host, port)).await?;
    Ok(listener)
}

pub async fn start_server(
    price_service: PriceService,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let app = router(price_service);
    let listener = bind_listener(host, port).await?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
