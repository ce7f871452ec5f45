//! Integration tests for service request resolution.

mod helpers;

use std::sync::Arc;

use serde_json::json;

use helpers::{FakeServiceRequestApi, page_with, raw};
use tradedesk_cache::{EntityResolutionCache, NOT_PROVIDED};
use tradedesk_core::config::cache::CacheConfig;
use tradedesk_core::error::ErrorKind;
use tradedesk_core::types::PageRequest;

fn cache_over(api: &Arc<FakeServiceRequestApi>) -> EntityResolutionCache {
    EntityResolutionCache::from_config(api.clone(), &CacheConfig::default()).unwrap()
}

#[tokio::test]
async fn test_cfr_without_port_or_country_is_not_provided() {
    let api = Arc::new(FakeServiceRequestApi::with_available(page_with(json!({
        "id": "SR-42",
        "offer_id": "OF-1",
        "buyer_incoterm": "cfr",
        "warehouse_address": "should be ignored"
    }))));
    let cache = cache_over(&api);

    let record = cache
        .resolve_by_id("SR-42", None, Some(PageRequest::new(20, 0)))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.incoterm, "CFR");
    assert_eq!(record.destination, NOT_PROVIDED);
    assert_eq!(cache.len().await, 20);
}

#[tokio::test]
async fn test_ddp_uses_warehouse_address() {
    let api = Arc::new(FakeServiceRequestApi::with_available(page_with(json!({
        "service_request_id": 42,
        "incoterms": "DDP",
        "delivery_address": "Unit 7, Jebel Ali Free Zone",
        "country_code": "AE"
    }))));
    let cache = cache_over(&api);

    let record = cache.resolve_by_id("42", None, None).await.unwrap().unwrap();
    assert_eq!(record.destination, "Unit 7, Jebel Ali Free Zone");
}

#[tokio::test]
async fn test_second_lookup_makes_no_network_call() {
    let api = Arc::new(FakeServiceRequestApi::with_available(vec![raw(json!({
        "id": "SR-1",
        "incoterm": "cif",
        "port_of_discharge": "Mombasa"
    }))]));
    let cache = cache_over(&api);

    let first = cache.resolve_by_id("SR-1", None, None).await.unwrap();
    api.poison();
    let second = cache.resolve_by_id("SR-1", Some("OF-9"), None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.unwrap().destination, "Mombasa");
}

#[tokio::test]
async fn test_forbidden_on_both_listings_propagates() {
    let api = Arc::new(FakeServiceRequestApi::default());
    api.fail_all(403);
    let cache = cache_over(&api);

    let err = cache
        .resolve_by_id("SR-1", Some("OF-1"), None)
        .await
        .unwrap_err();

    assert_eq!(err.status, Some(403));
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(api.calls(), (1, 1));
}

#[tokio::test]
async fn test_by_offer_fallback_after_global_miss() {
    let api = Arc::new(FakeServiceRequestApi::with_available(page_with(json!({"id": "OTHER"}))));
    api.set_by_offer(
        "OF-3",
        vec![
            raw(json!({"id": "SR-7", "offerId": "OF-3", "incoterm": "dap", "warehouse_code": "WH-12"})),
            raw(json!({"id": "SR-8", "offerId": "OF-3"})),
        ],
    );
    let cache = cache_over(&api);

    let record = cache
        .resolve_by_id("SR-7", Some("OF-3"), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.destination, "WH-12");
    assert_eq!(api.calls(), (1, 1));
    assert!(cache.contains("SR-8").await);
}

#[tokio::test]
async fn test_absent_record_is_none_on_server_error() {
    let api = Arc::new(FakeServiceRequestApi::default());
    api.fail_available(503);
    let cache = cache_over(&api);

    assert!(cache.resolve_by_id("SR-1", None, None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_primed_listing_guarantees_hits() {
    let api = Arc::new(FakeServiceRequestApi::default());
    let cache = cache_over(&api);
    api.poison();

    let listing = vec![
        raw(json!({"id": "SR-1", "incoterm": "fob", "warehouse_address": "Dock 3"})),
        raw(json!({"id": "SR-2", "incoterm": "cif", "country_code": "TZ"})),
    ];
    assert_eq!(cache.prime_from_list(&listing).await, 2);

    let second = cache.resolve_by_id("SR-2", None, None).await.unwrap().unwrap();
    assert_eq!(second.destination, "TZ");

    cache.clear().await;
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_bounded_provider_resolves_the_same() {
    let api = Arc::new(FakeServiceRequestApi::with_available(vec![raw(json!({"id": "SR-1"}))]));
    let config = CacheConfig {
        provider: "bounded".to_string(),
        max_capacity: 100,
        ..CacheConfig::default()
    };
    let cache = EntityResolutionCache::from_config(api.clone(), &config).unwrap();

    let record = cache.resolve_by_id("SR-1", None, None).await.unwrap().unwrap();
    assert_eq!(record.destination, NOT_PROVIDED);
    assert!(cache.get("SR-1").await.is_some());
}
