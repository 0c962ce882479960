// tests/api/test_metal_routes.rs
// HTTP routes over a stubbed upstream

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use metal_rates::api::{router, FETCHED_AT_HEADER};
use metal_rates::prices::FetchError;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use crate::common::{service_over, CountingSource, GOLD_PAGE};

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let fetched_at = response
        .headers()
        .get(FETCHED_AT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, fetched_at, body)
}

fn app_serving(page: &str) -> Router {
    router(service_over(CountingSource::serving(page), Duration::from_secs(180)))
}

#[tokio::test]
async fn test_all_metals_route() {
    let (status, fetched_at, body) = get(app_serving(GOLD_PAGE), "/api/metals").await;

    assert_eq!(status, StatusCode::OK);
    assert!(fetched_at.is_some());
    assert_eq!(body["gold"]["unit"], "INR/10g");
    assert_eq!(body["gold"]["types"]["gold 24 karat"], "15526");
}

#[tokio::test]
async fn test_single_metal_route_ignores_case() {
    let app = app_serving(GOLD_PAGE);

    let (status, _, upper) = get(app.clone(), "/api/metals/GOLD").await;
    let (_, _, lower) = get(app, "/api/metals/gold").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(upper, lower);
    assert_eq!(
        upper,
        json!({
            "types": { "gold 24 karat": "15526", "gold 22 karat": "14232" },
            "unit": "INR/10g"
        })
    );
}

#[tokio::test]
async fn test_unknown_metal_is_404() {
    let (status, _, body) = get(app_serving(GOLD_PAGE), "/api/metals/platinum").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Metal not found" }));
}

#[tokio::test]
async fn test_cold_upstream_failure_is_503() {
    let source = CountingSource::failing(FetchError::ConnectionFailed("refused".to_string()));
    let app = router(service_over(source, Duration::from_secs(180)));

    let (status, _, body) = get(app, "/api/metals").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Price source unavailable");
    assert!(body["detail"].as_str().unwrap().contains("refused"));
}

#[tokio::test]
async fn test_status_and_health_routes() {
    let app = app_serving(GOLD_PAGE);

    let (status, _, banner) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(banner["endpoints"]["/api/metals"].is_string());

    let (_, _, health) = get(app.clone(), "/health").await;
    assert_eq!(health["status"], "starting");
    assert_eq!(health["has_snapshot"], false);

    get(app.clone(), "/api/metals").await;
    let (_, _, health) = get(app, "/health").await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["refresh_attempts"], 1);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let response = app_serving(GOLD_PAGE)
        .oneshot(
            Request::builder()
                .uri("/api/metals")
                .header("origin", "https://dashboard.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
