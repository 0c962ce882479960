// tests/pipeline/test_end_to_end.rs
// Markup in, typed snapshot and query results out

use metal_rates::prices::ServiceError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{service_over, CountingSource, GOLD_PAGE, GOLD_SILVER_PAGE};

#[tokio::test]
async fn test_get_all_yields_gold_section() {
    let source = CountingSource::serving(GOLD_PAGE);
    let service = service_over(source, Duration::from_secs(180));

    let snapshot = service.get_all().await.unwrap();
    let value = serde_json::to_value(&*snapshot).unwrap();

    assert_eq!(
        value,
        json!({
            "gold": {
                "types": { "gold 24 karat": "15526", "gold 22 karat": "14232" },
                "unit": "INR/10g"
            }
        })
    );
}

#[tokio::test]
async fn test_types_keep_page_order() {
    let source = CountingSource::serving(GOLD_PAGE);
    let service = service_over(source, Duration::from_secs(180));

    let gold = service.get_one("gold").await.unwrap();
    let json = serde_json::to_string(&gold).unwrap();
    let first = json.find("gold 24 karat").unwrap();
    let second = json.find("gold 22 karat").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn test_get_all_twice_within_window_is_identical() {
    let source = CountingSource::serving(GOLD_PAGE);
    let service = service_over(source.clone(), Duration::from_secs(180));

    let first = service.get_all().await.unwrap();
    let second = service.get_all().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.fetched_at(), second.fetched_at());
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_get_one_case_insensitive() {
    let source = CountingSource::serving(GOLD_SILVER_PAGE);
    let service = service_over(source, Duration::from_secs(180));

    let upper = service.get_one("GOLD").await.unwrap();
    let lower = service.get_one("gold").await.unwrap();
    assert_eq!(upper, lower);
    assert_eq!(upper.price("gold 24 karat"), Some("15610"));
}

#[tokio::test]
async fn test_get_one_unknown_metal() {
    let source = CountingSource::serving(GOLD_SILVER_PAGE);
    let service = service_over(source, Duration::from_secs(180));

    let result = service.get_one("platinum").await;
    assert_eq!(
        result,
        Err(ServiceError::NotFound {
            metal: "platinum".to_string()
        })
    );
}

#[tokio::test]
async fn test_metals_without_rows_are_absent() {
    let page = r#"
        <table>
            <tr><th>Gold</th><th>Price (INR/10g)</th></tr>
            <tr><td>Gold 24 Karat</td><td>15526</td></tr>
            <tr><th>Silver</th><th>Price (INR/kg)</th></tr>
            <tr><td>Silver 999</td><td>n/a</td></tr>
        </table>
    "#;
    let source = CountingSource::serving(page);
    let service = service_over(source, Duration::from_secs(180));

    let snapshot = service.get_all().await.unwrap();
    assert!(snapshot.metal("silver").is_none());
    assert!(matches!(
        service.get_one("silver").await,
        Err(ServiceError::NotFound { .. })
    ));
}
