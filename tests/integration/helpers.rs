//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use url::Url;

use tradedesk_client::{NotificationApi, ServiceRequestApi};
use tradedesk_core::error::AppError;
use tradedesk_core::result::AppResult;
use tradedesk_core::types::{ListPayload, PageRequest};
use tradedesk_entity::notification::Notification;
use tradedesk_entity::raw::RawRecord;
use tradedesk_realtime::{PushConnection, PushTransport};

/// Build a notification with an explicit read flag.
pub fn notification(id: &str, is_read: bool) -> Notification {
    let mut n = Notification::new(id, format!("Notification {id}"));
    n.is_read = Some(is_read);
    n
}

/// Wrap a JSON object as a raw listing record.
pub fn raw(value: Value) -> RawRecord {
    RawRecord::from(value)
}

/// A page of 20 filler service requests with `target` at index 5.
pub fn page_with(target: Value) -> Vec<RawRecord> {
    let mut page: Vec<RawRecord> = (0..20)
        .map(|i| raw(json!({"id": format!("FILLER-{i}"), "incoterm": "fob"})))
        .collect();
    page[5] = raw(target);
    page
}

/// Let spawned tasks run without advancing time.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

#[derive(Debug, Default)]
struct NotificationState {
    page: Vec<Notification>,
    unread: u64,
    fail_mark: bool,
    fail_unread: bool,
    unread_calls: usize,
    mark_calls: Vec<Vec<String>>,
}

/// In-memory notification endpoints.
#[derive(Debug, Default)]
pub struct FakeNotificationApi {
    state: Mutex<NotificationState>,
}

impl FakeNotificationApi {
    pub fn new(page: Vec<Notification>, unread: u64) -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.page = page;
            state.unread = unread;
        }
        api
    }

    pub fn set_unread(&self, unread: u64) {
        self.state.lock().unwrap().unread = unread;
    }

    pub fn fail_mark(&self, fail: bool) {
        self.state.lock().unwrap().fail_mark = fail;
    }

    pub fn fail_unread(&self, fail: bool) {
        self.state.lock().unwrap().fail_unread = fail;
    }

    pub fn unread_calls(&self) -> usize {
        self.state.lock().unwrap().unread_calls
    }

    pub fn mark_calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().mark_calls.clone()
    }
}

#[async_trait]
impl NotificationApi for FakeNotificationApi {
    async fn list_notifications(&self, page: PageRequest) -> AppResult<Vec<Notification>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .page
            .iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn unread_count(&self) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.unread_calls += 1;
        if state.fail_unread {
            return Err(AppError::transport("connection reset"));
        }
        Ok(state.unread)
    }

    async fn mark_read(&self, ids: &[String]) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.mark_calls.push(ids.to_vec());
        if state.fail_mark {
            return Err(AppError::from_status(500, "acknowledgement failed"));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ListingState {
    available: Vec<RawRecord>,
    by_offer: HashMap<String, Vec<RawRecord>>,
    available_status: Option<u16>,
    by_offer_status: Option<u16>,
    poisoned: bool,
    available_calls: usize,
    by_offer_calls: usize,
}

/// In-memory service request listings.
///
/// The global listing answers with a bare array, the by-offer listing with
/// a `{ data: [...] }` envelope.
#[derive(Debug, Default)]
pub struct FakeServiceRequestApi {
    state: Mutex<ListingState>,
}

impl FakeServiceRequestApi {
    pub fn with_available(records: Vec<RawRecord>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().available = records;
        api
    }

    pub fn set_by_offer(&self, offer_id: &str, records: Vec<RawRecord>) {
        self.state
            .lock()
            .unwrap()
            .by_offer
            .insert(offer_id.to_string(), records);
    }

    /// Make both listings answer with `status`.
    pub fn fail_all(&self, status: u16) {
        let mut state = self.state.lock().unwrap();
        state.available_status = Some(status);
        state.by_offer_status = Some(status);
    }

    pub fn fail_available(&self, status: u16) {
        self.state.lock().unwrap().available_status = Some(status);
    }

    /// Any further call panics.
    pub fn poison(&self) {
        self.state.lock().unwrap().poisoned = true;
    }

    pub fn calls(&self) -> (usize, usize) {
        let state = self.state.lock().unwrap();
        (state.available_calls, state.by_offer_calls)
    }
}

#[async_trait]
impl ServiceRequestApi for FakeServiceRequestApi {
    async fn list_available(&self, _page: PageRequest) -> AppResult<ListPayload<RawRecord>> {
        let mut state = self.state.lock().unwrap();
        assert!(!state.poisoned, "unexpected network call");
        state.available_calls += 1;
        if let Some(status) = state.available_status {
            return Err(AppError::from_status(status, "listing rejected"));
        }
        Ok(ListPayload::Bare(state.available.clone()))
    }

    async fn list_by_offer(&self, offer_id: &str) -> AppResult<ListPayload<RawRecord>> {
        let mut state = self.state.lock().unwrap();
        assert!(!state.poisoned, "unexpected network call");
        state.by_offer_calls += 1;
        if let Some(status) = state.by_offer_status {
            return Err(AppError::from_status(status, "listing rejected"));
        }
        Ok(ListPayload::Enveloped {
            data: state.by_offer.get(offer_id).cloned().unwrap_or_default(),
        })
    }
}

enum Frame {
    Text(String),
    Close,
}

#[derive(Default)]
struct TransportState {
    refuse: bool,
    urls: Vec<Url>,
    servers: Vec<mpsc::UnboundedSender<Frame>>,
}

/// Push transport whose connections are driven by the test.
#[derive(Default)]
pub struct FakeTransport {
    state: Mutex<TransportState>,
    live: Arc<AtomicUsize>,
}

impl std::fmt::Debug for FakeTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeTransport")
            .field("live", &self.live())
            .finish()
    }
}

impl FakeTransport {
    pub fn refuse(&self, refuse: bool) {
        self.state.lock().unwrap().refuse = refuse;
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().urls.len()
    }

    pub fn urls(&self) -> Vec<Url> {
        self.state.lock().unwrap().urls.clone()
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn push(&self, value: Value) {
        self.send(Frame::Text(value.to_string()));
    }

    pub fn push_raw(&self, text: &str) {
        self.send(Frame::Text(text.to_string()));
    }

    pub fn drop_connection(&self) {
        self.send(Frame::Close);
    }

    fn send(&self, frame: Frame) {
        if let Some(server) = self.state.lock().unwrap().servers.last() {
            let _ = server.send(frame);
        }
    }
}

#[async_trait]
impl PushTransport for FakeTransport {
    async fn connect(&self, url: &Url) -> AppResult<Box<dyn PushConnection>> {
        let mut state = self.state.lock().unwrap();
        state.urls.push(url.clone());
        if state.refuse {
            return Err(AppError::transport("connection refused"));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        state.servers.push(tx);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            frames: rx,
            live: Arc::clone(&self.live),
            open: true,
        }))
    }
}

struct FakeConnection {
    frames: mpsc::UnboundedReceiver<Frame>,
    live: Arc<AtomicUsize>,
    open: bool,
}

impl FakeConnection {
    fn release(&mut self) {
        if self.open {
            self.open = false;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl PushConnection for FakeConnection {
    async fn next_text(&mut self) -> Option<AppResult<String>> {
        match self.frames.recv().await {
            Some(Frame::Text(text)) => Some(Ok(text)),
            Some(Frame::Close) | None => {
                self.release();
                None
            }
        }
    }

    async fn close(&mut self) {
        self.release();
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.release();
    }
}
