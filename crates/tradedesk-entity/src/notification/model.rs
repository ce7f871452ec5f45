//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_type::EntityType;

/// A notification delivered to the current user.
///
/// The same shape arrives from the list endpoint and inside push events;
/// push payloads may omit fields or send them as `null`, so everything
/// except `id` is defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    #[serde(deserialize_with = "crate::wire::opaque_id")]
    pub id: String,
    /// Notification title.
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub title: String,
    /// Notification body text.
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub message: String,
    /// When the notification was created; offset-less values are UTC.
    #[serde(default, deserialize_with = "crate::wire::lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Whether the user has read this notification; `None` when not sent.
    #[serde(default)]
    pub is_read: Option<bool>,
    /// Kind of entity the notification refers to.
    #[serde(default)]
    pub entity_type: Option<EntityType>,
    /// Identifier of the referenced entity.
    #[serde(default, deserialize_with = "crate::wire::opaque_id_opt")]
    pub entity_id: Option<String>,
}

impl Notification {
    /// Create an unread notification with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message: String::new(),
            created_at: None,
            is_read: Some(false),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Check if the notification is explicitly marked unread.
    ///
    /// A missing flag does not count: such an item never raised the
    /// counter, so it must not lower it either.
    pub fn is_unread(&self) -> bool {
        self.is_read == Some(false)
    }

    /// Overlay the fields carried by `incoming` onto this entry.
    ///
    /// Empty strings and absent values in `incoming` leave the existing
    /// field untouched.
    pub fn merge_from(&mut self, incoming: &Notification) {
        if !incoming.title.is_empty() {
            self.title = incoming.title.clone();
        }
        if !incoming.message.is_empty() {
            self.message = incoming.message.clone();
        }
        if incoming.created_at.is_some() {
            self.created_at = incoming.created_at;
        }
        if incoming.is_read.is_some() {
            self.is_read = incoming.is_read;
        }
        if incoming.entity_type.is_some() {
            self.entity_type = incoming.entity_type;
        }
        if incoming.entity_id.is_some() {
            self.entity_id = incoming.entity_id.clone();
        }
    }
}
