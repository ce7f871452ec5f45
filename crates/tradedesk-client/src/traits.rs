//! Collaborator traits for the REST endpoints the core consumes.

use async_trait::async_trait;

use tradedesk_core::result::AppResult;
use tradedesk_core::types::{ListPayload, PageRequest};
use tradedesk_entity::notification::Notification;
use tradedesk_entity::raw::RawRecord;

/// Notification endpoints.
#[async_trait]
pub trait NotificationApi: Send + Sync + std::fmt::Debug + 'static {
    /// `GET /notifications/my?limit&offset`
    async fn list_notifications(&self, page: PageRequest) -> AppResult<Vec<Notification>>;

    /// `GET /notifications/unread-count`
    async fn unread_count(&self) -> AppResult<u64>;

    /// `POST /notifications/mark-read` with `{ "ids": [...] }`
    async fn mark_read(&self, ids: &[String]) -> AppResult<()>;
}

/// Service request listing endpoints.
///
/// Neither endpoint supports fetch-by-id; both may answer with a bare array
/// or a `{ data: [...] }` envelope.
#[async_trait]
pub trait ServiceRequestApi: Send + Sync + std::fmt::Debug + 'static {
    /// List every service request visible to the caller.
    async fn list_available(&self, page: PageRequest) -> AppResult<ListPayload<RawRecord>>;

    /// List the service requests raised against one offer.
    async fn list_by_offer(&self, offer_id: &str) -> AppResult<ListPayload<RawRecord>>;
}
