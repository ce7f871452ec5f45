//! In-memory fakes for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use tradedesk_client::NotificationApi;
use tradedesk_core::error::AppError;
use tradedesk_core::result::AppResult;
use tradedesk_core::types::PageRequest;
use tradedesk_entity::notification::Notification;

use crate::transport::{PushConnection, PushTransport};

#[derive(Debug, Default)]
struct ApiState {
    page: Vec<Notification>,
    unread: u64,
    fail_list: bool,
    fail_unread: bool,
    fail_mark: bool,
    unread_calls: usize,
    mark_calls: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeNotificationApi {
    state: Mutex<ApiState>,
}

impl FakeNotificationApi {
    pub(crate) fn with_page(page: Vec<Notification>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().page = page;
        api
    }

    pub(crate) fn set_unread(&self, count: u64) {
        self.state.lock().unwrap().unread = count;
    }

    pub(crate) fn fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    pub(crate) fn fail_unread(&self, fail: bool) {
        self.state.lock().unwrap().fail_unread = fail;
    }

    pub(crate) fn fail_mark(&self, fail: bool) {
        self.state.lock().unwrap().fail_mark = fail;
    }

    pub(crate) fn unread_calls(&self) -> usize {
        self.state.lock().unwrap().unread_calls
    }

    pub(crate) fn mark_calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().mark_calls.clone()
    }
}

#[async_trait]
impl NotificationApi for FakeNotificationApi {
    async fn list_notifications(&self, _page: PageRequest) -> AppResult<Vec<Notification>> {
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(AppError::transport("list unavailable"));
        }
        Ok(state.page.clone())
    }

    async fn unread_count(&self) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.unread_calls += 1;
        if state.fail_unread {
            return Err(AppError::transport("count unavailable"));
        }
        Ok(state.unread)
    }

    async fn mark_read(&self, ids: &[String]) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.mark_calls.push(ids.to_vec());
        if state.fail_mark {
            return Err(AppError::from_status(500, "mark-read failed"));
        }
        Ok(())
    }
}

enum Frame {
    Text(String),
    Error(String),
    Close,
}

#[derive(Debug, Default)]
struct TransportState {
    fail_connect: bool,
    urls: Vec<Url>,
    servers: Vec<mpsc::UnboundedSender<Frame>>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => write!(f, "Text({text})"),
            Self::Error(reason) => write!(f, "Error({reason})"),
            Self::Close => write!(f, "Close"),
        }
    }
}

/// Transport whose connections are driven by the test.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    state: Mutex<TransportState>,
    live: Arc<AtomicUsize>,
}

impl FakeTransport {
    pub(crate) fn set_fail_connect(&self, fail: bool) {
        self.state.lock().unwrap().fail_connect = fail;
    }

    /// Number of connection attempts, successful or not.
    pub(crate) fn connects(&self) -> usize {
        self.state.lock().unwrap().urls.len()
    }

    pub(crate) fn last_url(&self) -> Option<Url> {
        self.state.lock().unwrap().urls.last().cloned()
    }

    /// Connections currently open.
    pub(crate) fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn send(&self, frame: Frame) {
        if let Some(server) = self.state.lock().unwrap().servers.last() {
            let _ = server.send(frame);
        }
    }

    pub(crate) fn push_text(&self, text: &str) {
        self.send(Frame::Text(text.to_string()));
    }

    pub(crate) fn fail_connection(&self, reason: &str) {
        self.send(Frame::Error(reason.to_string()));
    }

    pub(crate) fn drop_connection(&self) {
        self.send(Frame::Close);
    }
}

#[async_trait]
impl PushTransport for FakeTransport {
    async fn connect(&self, url: &Url) -> AppResult<Box<dyn PushConnection>> {
        let mut state = self.state.lock().unwrap();
        state.urls.push(url.clone());
        if state.fail_connect {
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
            Some(Frame::Error(reason)) => Some(Err(AppError::transport(reason))),
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
