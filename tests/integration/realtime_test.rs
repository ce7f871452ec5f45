//! Integration tests for the realtime notification client.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;

use helpers::{FakeNotificationApi, FakeTransport, notification, settle};
use tradedesk_core::config::realtime::RealtimeConfig;
use tradedesk_core::types::PageRequest;
use tradedesk_realtime::{ConnectionState, NotificationStore, RealtimeNotificationClient};

struct Session {
    api: Arc<FakeNotificationApi>,
    transport: Arc<FakeTransport>,
    store: Arc<NotificationStore>,
    client: RealtimeNotificationClient,
}

fn session_with(api: FakeNotificationApi, config: RealtimeConfig) -> Session {
    let api = Arc::new(api);
    let transport = Arc::new(FakeTransport::default());
    let store = Arc::new(NotificationStore::new(api.clone()));
    let client = RealtimeNotificationClient::spawn(
        &config,
        Url::parse("http://localhost:8000/api").unwrap(),
        transport.clone(),
        store.clone(),
    );
    Session {
        api,
        transport,
        store,
        client,
    }
}

fn session() -> Session {
    session_with(FakeNotificationApi::default(), RealtimeConfig::default())
}

async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}

/// Advance one second at a time so interval timers see every period.
async fn run_for(secs: u64) {
    for _ in 0..secs {
        advance(Duration::from_secs(1)).await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_push_channel_url_and_initial_refresh() {
    let s = session_with(FakeNotificationApi::new(Vec::new(), 6), RealtimeConfig::default());

    s.client.start_session("secret token").await.unwrap();
    settle().await;

    assert_eq!(
        s.transport.urls()[0].as_str(),
        "ws://localhost:8000/ws/notifications?token=secret+token"
    );
    assert_eq!(s.store.unread_count(), 6);
    assert_eq!(s.api.unread_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_delays_follow_linear_backoff() {
    let s = session();
    s.transport.refuse(true);
    s.client.start_session("tok").await.unwrap();
    settle().await;

    // Attempt n waits min(30 s, 2 s × n) after the previous failure.
    for attempt in 1..=17u64 {
        let delay = Duration::from_millis((2000 * attempt).min(30_000));
        let before = s.transport.connects();

        advance(delay - Duration::from_millis(50)).await;
        assert_eq!(s.transport.connects(), before, "attempt {attempt} fired early");
        advance(Duration::from_millis(100)).await;
        assert_eq!(s.transport.connects(), before + 1, "attempt {attempt} did not fire");
    }
}

#[tokio::test(start_paused = true)]
async fn test_single_channel_after_repeated_connects() {
    let s = session();

    s.client.start_session("one").await.unwrap();
    s.client.start_session("two").await.unwrap();
    settle().await;

    assert_eq!(s.transport.live(), 1);
    let last = s.transport.urls().pop().unwrap();
    assert!(last.as_str().ends_with("token=two"));

    s.client.end_session().await.unwrap();
    settle().await;
    assert_eq!(s.transport.live(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_polling_and_push_are_exclusive() {
    let config = RealtimeConfig {
        poll_interval_seconds: 10,
        backoff_step_ms: 60_000,
        backoff_cap_ms: 60_000,
        ..RealtimeConfig::default()
    };
    let s = session_with(FakeNotificationApi::default(), config);
    s.client.start_session("tok").await.unwrap();
    settle().await;
    let connected_calls = s.api.unread_calls();

    // Connected: no polling.
    run_for(35).await;
    assert_eq!(s.api.unread_calls(), connected_calls);

    // Disconnected: one refresh per interval.
    s.transport.drop_connection();
    settle().await;
    assert_eq!(s.client.current_state(), ConnectionState::Disconnected);
    run_for(35).await;
    assert_eq!(s.api.unread_calls(), connected_calls + 3);

    // Reconnected: polling stops, one refresh for the open.
    run_for(26).await;
    assert_eq!(s.client.current_state(), ConnectionState::Connected);
    let reconnected_calls = s.api.unread_calls();
    run_for(60).await;
    assert_eq!(s.api.unread_calls(), reconnected_calls);
}

#[tokio::test(start_paused = true)]
async fn test_pushes_merge_into_store() {
    let s = session_with(
        FakeNotificationApi::new(vec![notification("a", false), notification("b", true)], 1),
        RealtimeConfig::default(),
    );
    s.client.start_session("tok").await.unwrap();
    s.store.load_list(PageRequest::default()).await.unwrap();
    settle().await;
    assert_eq!(s.store.unread_count(), 1);

    s.transport.push(json!({
        "type": "notification",
        "notification": {"id": "c", "title": "New proposal", "is_read": false,
                         "entity_type": "PROPOSAL", "entity_id": 12}
    }));
    s.transport.push(json!({
        "type": "notification",
        "notification": {"id": "b", "is_read": false}
    }));
    s.transport.push(json!({
        "type": "notification",
        "notification": {"id": "a", "is_read": false}
    }));
    s.transport.push(json!({"type": "presence", "user": "u1"}));
    s.transport.push_raw("{not json");
    settle().await;

    let snapshot = s.store.snapshot();
    let order: Vec<&str> = snapshot.notifications.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(order, ["c", "a", "b"]);
    assert_eq!(snapshot.unread_count, 3);
    assert!(snapshot.connected);
    assert_eq!(snapshot.notifications[2].title, "Notification b");
}

#[tokio::test(start_paused = true)]
async fn test_logout_then_login_is_not_revived_by_stale_timer() {
    let s = session();
    s.client.start_session("first").await.unwrap();
    settle().await;

    s.transport.refuse(true);
    s.transport.drop_connection();
    settle().await;
    s.client.end_session().await.unwrap();
    assert_eq!(s.client.current_state(), ConnectionState::Idle);
    assert!(!s.store.is_connected());

    advance(Duration::from_secs(120)).await;
    assert_eq!(s.transport.connects(), 1);

    s.transport.refuse(false);
    s.client.start_session("second").await.unwrap();
    settle().await;
    assert_eq!(s.transport.connects(), 2);
    assert_eq!(s.transport.live(), 1);
    assert_eq!(s.client.current_state(), ConnectionState::Connected);

    let mut state = s.client.state();
    state.mark_unchanged();
    advance(Duration::from_secs(120)).await;
    assert!(!state.has_changed().unwrap());
    assert_eq!(s.transport.connects(), 2);
}
