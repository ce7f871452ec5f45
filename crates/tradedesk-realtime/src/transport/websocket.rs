//! WebSocket transport over tokio-tungstenite.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};
use url::Url;

use tradedesk_core::error::{AppError, ErrorKind};
use tradedesk_core::result::AppResult;

use super::{PushConnection, PushTransport};

/// Production push transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsTransport;

impl WsTransport {
    /// Create the transport.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PushTransport for WsTransport {
    async fn connect(&self, url: &Url) -> AppResult<Box<dyn PushConnection>> {
        let host = url.host_str().unwrap_or_default().to_string();
        let (stream, response) = connect_async(url.as_str()).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Transport,
                format!("WebSocket connect to {host} failed: {e}"),
                e,
            )
        })?;
        info!(host = %host, status = %response.status(), "push channel handshake complete");
        Ok(Box::new(WsConnection { stream }))
    }
}

struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl PushConnection for WsConnection {
    async fn next_text(&mut self) -> Option<AppResult<String>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.as_str().to_owned())),
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "server closed push channel");
                    return None;
                }
                // Control frames are answered by tungstenite; binary is not used.
                Ok(_) => continue,
                Err(e) => {
                    return Some(Err(AppError::with_source(
                        ErrorKind::Transport,
                        format!("WebSocket receive failed: {e}"),
                        e,
                    )));
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "push channel close failed");
        }
    }
}
