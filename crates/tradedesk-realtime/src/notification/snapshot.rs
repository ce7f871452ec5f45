//! Observable store state and the undo record of a read acknowledgement.

use serde::{Deserialize, Serialize};

use tradedesk_entity::notification::Notification;

/// Everything a consumer renders: the list, the badge and the link status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationSnapshot {
    /// Notifications, newest push first. Identifiers are unique.
    pub notifications: Vec<Notification>,
    /// Unread counter; never negative.
    pub unread_count: u64,
    /// Whether the push channel is currently open.
    pub connected: bool,
}

impl NotificationSnapshot {
    /// Position of the notification with `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.notifications.iter().position(|n| n.id == id)
    }

    /// Identifiers of every unread notification in the list.
    pub fn unread_ids(&self) -> Vec<String> {
        self.notifications
            .iter()
            .filter(|n| n.is_unread())
            .map(|n| n.id.clone())
            .collect()
    }
}

/// An optimistic read mark that has been applied locally but not yet
/// confirmed by the server.
///
/// Holds the exact list and counter from before the mutation so a failed
/// acknowledgement can be undone.
#[derive(Debug, Clone)]
pub struct ReadAcknowledgement {
    /// Identifiers that were unread and have been flipped.
    pub ids: Vec<String>,
    /// State before the flip.
    pub previous: NotificationSnapshot,
    pub(crate) epoch: u64,
}

impl ReadAcknowledgement {
    /// Number of notifications the acknowledgement covers.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the acknowledgement covers nothing.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
