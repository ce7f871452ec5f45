//! Push channel transport seam.
//!
//! A [`PushTransport`] opens connections; the driver runs each one in its
//! own task which reports [`ChannelEvent`]s, tagged with the channel's
//! generation, in the order the connection produced them.

pub mod websocket;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use url::Url;

use tradedesk_core::result::AppResult;

pub use websocket::WsTransport;

/// Lifecycle events of one push connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Handshake completed.
    Opened,
    /// A text frame arrived.
    Message(String),
    /// The connection failed.
    Error(String),
    /// The connection is gone.
    Closed,
}

/// Opens push connections.
#[async_trait]
pub trait PushTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Connect to `url` and complete the handshake.
    async fn connect(&self, url: &Url) -> AppResult<Box<dyn PushConnection>>;
}

/// An open push connection.
#[async_trait]
pub trait PushConnection: Send + 'static {
    /// Wait for the next text frame. `None` once the peer closed.
    async fn next_text(&mut self) -> Option<AppResult<String>>;

    /// Close the connection.
    async fn close(&mut self);
}

/// Handle to a running channel task.
///
/// Dropping the handle also stops the task.
#[derive(Debug)]
pub struct ChannelHandle {
    generation: u64,
    shutdown: Option<oneshot::Sender<()>>,
}

impl ChannelHandle {
    /// Spawn a task that connects to `url` and forwards its events.
    pub fn spawn(
        transport: Arc<dyn PushTransport>,
        url: Url,
        generation: u64,
        events: mpsc::Sender<(u64, ChannelEvent)>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(run_channel(
            transport,
            url,
            generation,
            events,
            shutdown_rx,
        ));
        Self {
            generation,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Generation this channel reports under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ask the task to close its connection and stop reporting.
    pub fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_channel(
    transport: Arc<dyn PushTransport>,
    url: Url,
    generation: u64,
    events: mpsc::Sender<(u64, ChannelEvent)>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let emit = |event: ChannelEvent| {
        let events = events.clone();
        async move { events.send((generation, event)).await.is_ok() }
    };

    let connected = tokio::select! {
        biased;
        _ = &mut shutdown => return,
        result = transport.connect(&url) => result,
    };

    let mut connection = match connected {
        Ok(connection) => connection,
        Err(e) => {
            debug!(generation, error = %e, "push channel connect failed");
            if emit(ChannelEvent::Error(e.to_string())).await {
                emit(ChannelEvent::Closed).await;
            }
            return;
        }
    };

    if !emit(ChannelEvent::Opened).await {
        connection.close().await;
        return;
    }

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                debug!(generation, "closing push channel");
                connection.close().await;
                return;
            }
            frame = connection.next_text() => match frame {
                Some(Ok(text)) => {
                    if !emit(ChannelEvent::Message(text)).await {
                        connection.close().await;
                        return;
                    }
                }
                Some(Err(e)) => {
                    connection.close().await;
                    if emit(ChannelEvent::Error(e.to_string())).await {
                        emit(ChannelEvent::Closed).await;
                    }
                    return;
                }
                None => {
                    emit(ChannelEvent::Closed).await;
                    return;
                }
            }
        }
    }
}
