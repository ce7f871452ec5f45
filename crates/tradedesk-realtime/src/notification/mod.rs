//! Notification list and unread counter state.

pub mod snapshot;
pub mod store;

pub use snapshot::{NotificationSnapshot, ReadAcknowledgement};
pub use store::NotificationStore;
