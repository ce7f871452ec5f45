//! Integration tests for the notification store.

mod helpers;

use std::sync::Arc;

use helpers::{FakeNotificationApi, notification, settle};
use tradedesk_core::error::ErrorKind;
use tradedesk_core::types::PageRequest;
use tradedesk_realtime::NotificationStore;

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_failed_acknowledgement_restores_snapshot() {
    let api = Arc::new(FakeNotificationApi::new(vec![notification("a", false)], 1));
    let store = NotificationStore::new(api.clone());
    store.load_list(PageRequest::default()).await.unwrap();
    store.refresh_unread_count().await;
    let before = store.snapshot();

    api.fail_mark(true);
    let err = store.mark_as_read(&ids(&["a"])).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Rollback);
    assert_eq!(err.status, Some(500));
    let after = store.snapshot();
    assert_eq!(after, before);
    assert_eq!(after.notifications[0].is_read, Some(false));
    assert_eq!(after.unread_count, 1);
}

#[tokio::test]
async fn test_counter_floor_with_extra_ids() {
    let api = Arc::new(FakeNotificationApi::new(
        vec![notification("a", false), notification("b", true)],
        0,
    ));
    let store = NotificationStore::new(api.clone());
    store.load_list(PageRequest::default()).await.unwrap();
    store.refresh_unread_count().await;
    assert_eq!(store.unread_count(), 0);

    store
        .mark_as_read(&ids(&["a", "b", "c", "d"]))
        .await
        .unwrap();
    assert_eq!(store.unread_count(), 0);
    assert_eq!(api.mark_calls(), vec![ids(&["a"])]);
}

#[tokio::test]
async fn test_repeated_read_push_is_idempotent() {
    let api = Arc::new(FakeNotificationApi::default());
    let store = NotificationStore::new(api);

    store.push_realtime(notification("x", true));
    store.push_realtime(notification("x", true));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.notifications.len(), 1);
    assert_eq!(snapshot.unread_count, 0);
}

#[tokio::test]
async fn test_list_load_never_lowers_counter() {
    let api = Arc::new(FakeNotificationApi::new(
        vec![notification("a", false), notification("b", false)],
        9,
    ));
    let store = NotificationStore::new(api.clone());

    store.refresh_unread_count().await;
    store.load_list(PageRequest::new(10, 0)).await.unwrap();
    assert_eq!(store.unread_count(), 9);

    api.set_unread(1);
    store.refresh_unread_count().await;
    store.load_list(PageRequest::new(10, 0)).await.unwrap();
    assert_eq!(store.unread_count(), 2);
}

#[tokio::test]
async fn test_refresh_failure_returns_previous_value() {
    let api = Arc::new(FakeNotificationApi::new(Vec::new(), 4));
    let store = NotificationStore::new(api.clone());
    assert_eq!(store.refresh_unread_count().await, 4);

    api.fail_unread(true);
    assert_eq!(store.refresh_unread_count().await, 4);
}

#[tokio::test]
async fn test_already_read_ids_still_reach_server() {
    let api = Arc::new(FakeNotificationApi::new(vec![notification("a", true)], 0));
    let store = NotificationStore::new(api.clone());
    store.load_list(PageRequest::default()).await.unwrap();

    store.mark_as_read(&ids(&["a"])).await.unwrap();
    settle().await;

    assert_eq!(api.mark_calls(), vec![ids(&["a"])]);
}

#[tokio::test]
async fn test_subscriber_observes_optimistic_update() {
    let api = Arc::new(FakeNotificationApi::new(
        vec![notification("a", false), notification("b", false)],
        2,
    ));
    let store = NotificationStore::new(api.clone());
    store.load_list(PageRequest::default()).await.unwrap();
    let mut rx = store.subscribe();
    rx.mark_unchanged();

    store.mark_all_as_read().await.unwrap();

    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.unread_count, 0);
    assert!(snapshot.notifications.iter().all(|n| n.is_read == Some(true)));
}
