//! # tradedesk-client
//!
//! The REST endpoints the TradeDesk core depends on, expressed as two
//! traits so the cache and the realtime client can be driven by fakes in
//! tests, plus [`HttpApiClient`], the reqwest implementation used in
//! production.
//!
//! Every call attaches the session's bearer token. A 401/403 answer is
//! surfaced as an [`AppError`](tradedesk_core::AppError) whose
//! `is_auth_failure()` is true; callers decide what to do with it.

pub mod http;
pub mod traits;

pub use http::HttpApiClient;
pub use traits::{NotificationApi, ServiceRequestApi};
