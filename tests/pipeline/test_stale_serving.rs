// tests/pipeline/test_stale_serving.rs
// Availability over freshness when the upstream breaks

use metal_rates::prices::{FetchError, ServiceError};
use std::sync::Arc;
use std::time::Duration;

use crate::common::{service_over, CountingSource, GOLD_PAGE, GOLD_SILVER_PAGE};

#[tokio::test]
async fn test_fetch_failure_after_success_serves_prior_snapshot() {
    let source = CountingSource::serving(GOLD_PAGE);
    let service = service_over(source.clone(), Duration::ZERO);

    let before = service.get_all().await.unwrap();
    source.set_response(Err(FetchError::HttpStatus(
        502,
        "https://example.com".to_string(),
    )));
    let after = service.get_all().await.unwrap();

    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(source.calls(), 2);
    assert_eq!(service.cache_stats().failures, 1);
}

#[tokio::test]
async fn test_layout_change_after_success_serves_prior_snapshot() {
    let source = CountingSource::serving(GOLD_PAGE);
    let service = service_over(source.clone(), Duration::ZERO);

    let before = service.get_all().await.unwrap();
    source.set_response(Ok("<div>We moved things around</div>".to_string()));
    let after = service.get_all().await.unwrap();

    assert_eq!(*before, *after);
    let stats = service.cache_stats();
    assert!(stats.last_error.unwrap().contains("not found"));
}

#[tokio::test]
async fn test_cold_failure_is_source_unavailable() {
    let source = CountingSource::failing(FetchError::Timeout("https://example.com".to_string()));
    let service = service_over(source, Duration::from_secs(180));

    let result = service.get_all().await;
    match result {
        Err(ServiceError::SourceUnavailable { reason }) => assert!(reason.contains("Timeout")),
        other => panic!("expected SourceUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recovery_replaces_snapshot_wholesale() {
    let source = CountingSource::serving(GOLD_PAGE);
    let service = service_over(source.clone(), Duration::ZERO);

    let first = service.get_all().await.unwrap();
    source.set_response(Ok(GOLD_SILVER_PAGE.to_string()));
    let second = service.get_all().await.unwrap();

    // Old snapshot is untouched; the new one is a separate value
    assert_eq!(first.metal("gold").unwrap().price("gold 24 karat"), Some("15526"));
    assert!(first.metal("silver").is_none());
    assert_eq!(second.metal("gold").unwrap().price("gold 24 karat"), Some("15610"));
    assert!(second.metal("silver").is_some());
    assert!(second.metal("gold").unwrap().price("gold 22 karat").is_none());
}
