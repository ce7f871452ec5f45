//! Server-to-client push message definitions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tradedesk_entity::notification::Notification;

use super::validator::validate_inbound;

/// Messages sent by the server over the notifications channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A notification was created or updated.
    Notification {
        /// The notification payload.
        notification: Notification,
    },
}

/// Extract the notification carried by a push frame.
///
/// Anything that is not a well-formed `notification` event (invalid JSON,
/// another `type`, missing payload) yields `None`.
pub fn parse_push(raw: &str) -> Option<Notification> {
    if let Err(e) = validate_inbound(raw) {
        debug!(error = %e, "discarding push frame");
        return None;
    }

    match serde_json::from_str::<ServerMessage>(raw) {
        Ok(ServerMessage::Notification { notification }) => Some(notification),
        Err(e) => {
            debug!(error = %e, "discarding unrecognized push frame");
            None
        }
    }
}
