//! reqwest implementation of the collaborator traits.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use tradedesk_core::config::api::ApiConfig;
use tradedesk_core::error::{AppError, ErrorKind};
use tradedesk_core::result::AppResult;
use tradedesk_core::types::{ListPayload, PageRequest};
use tradedesk_entity::notification::Notification;
use tradedesk_entity::raw::RawRecord;

use crate::traits::{NotificationApi, ServiceRequestApi};

const NOTIFICATIONS_MY: &str = "/notifications/my";
const NOTIFICATIONS_UNREAD_COUNT: &str = "/notifications/unread-count";
const NOTIFICATIONS_MARK_READ: &str = "/notifications/mark-read";
const SERVICE_REQUESTS_AVAILABLE: &str = "/service-requests/available";
const SERVICE_REQUESTS_BY_OFFER: &str = "/service-requests/offer";

/// HTTP client for the TradeDesk REST API.
///
/// Holds the session token; [`set_token`](Self::set_token) and
/// [`clear_token`](Self::clear_token) follow login and logout.
#[derive(Debug)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct UnreadCountResponse {
    unread_count: u64,
}

#[derive(Debug, Serialize)]
struct MarkReadRequest<'a> {
    ids: &'a [String],
}

impl HttpApiClient {
    /// Create a client from the API configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url,
            token: RwLock::new(config.token.clone()),
        })
    }

    /// Create a client against `base_url` with default settings.
    pub fn with_base_url(base_url: &str) -> AppResult<Self> {
        Self::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    /// The configured REST base address.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Install the bearer token of a new session.
    pub fn set_token(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
    }

    /// Forget the bearer token (logout).
    pub fn clear_token(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = self.authorized(builder).send().await.map_err(|e| {
            AppError::with_source(ErrorKind::Transport, format!("HTTP request failed: {e}"), e)
        })?;

        let status = response.status();
        debug!(status = %status, url = %response.url(), "response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if matches!(status.as_u16(), 401 | 403) {
            warn!(status = %status, "request rejected by authorization");
        }
        Err(AppError::from_status(
            status.as_u16(),
            format!("API returned {status}: {body}"),
        ))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let body = response.text().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Transport,
                format!("failed to read response body: {e}"),
                e,
            )
        })?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Decode list rows one by one, skipping any that do not fit.
fn notification_rows(rows: Vec<Value>) -> Vec<Notification> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(notification) => Some(notification),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed notification row");
                None
            }
        })
        .collect()
}

#[async_trait]
impl NotificationApi for HttpApiClient {
    async fn list_notifications(&self, page: PageRequest) -> AppResult<Vec<Notification>> {
        let request = self
            .http
            .get(self.endpoint(NOTIFICATIONS_MY))
            .query(&page.query_pairs());
        let response = self.send(request).await?;
        let payload: ListPayload<Value> = Self::decode(response).await?;
        Ok(notification_rows(payload.into_items()))
    }

    async fn unread_count(&self) -> AppResult<u64> {
        let request = self.http.get(self.endpoint(NOTIFICATIONS_UNREAD_COUNT));
        let response = self.send(request).await?;
        let body: UnreadCountResponse = Self::decode(response).await?;
        Ok(body.unread_count)
    }

    async fn mark_read(&self, ids: &[String]) -> AppResult<()> {
        let request = self
            .http
            .post(self.endpoint(NOTIFICATIONS_MARK_READ))
            .json(&MarkReadRequest { ids });
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceRequestApi for HttpApiClient {
    async fn list_available(&self, page: PageRequest) -> AppResult<ListPayload<RawRecord>> {
        let request = self
            .http
            .get(self.endpoint(SERVICE_REQUESTS_AVAILABLE))
            .query(&page.query_pairs());
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn list_by_offer(&self, offer_id: &str) -> AppResult<ListPayload<RawRecord>> {
        let mut url = Url::parse(&self.endpoint(SERVICE_REQUESTS_BY_OFFER))?;
        url.path_segments_mut()
            .map_err(|_| AppError::configuration("API base URL cannot carry a path"))?
            .push(offer_id);
        let response = self.send(self.http.get(url)).await?;
        Self::decode(response).await
    }
}
