//! The two shapes list endpoints answer with.
//!
//! Some endpoints return a bare JSON array, others wrap it as
//! `{ "data": [...] }`. [`ListPayload`] accepts both so the shape is
//! resolved once, where the response is decoded.

use serde::{Deserialize, Serialize};

/// A list response: either a bare array or a `{ data: [...] }` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    /// `[ ... ]`
    Bare(Vec<T>),
    /// `{ "data": [ ... ] }`
    Enveloped {
        /// The wrapped items.
        data: Vec<T>,
    },
}

impl<T> ListPayload<T> {
    /// Unwrap into the contained items regardless of shape.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Enveloped { data } => data,
        }
    }

    /// Number of items carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Bare(items) => items.len(),
            Self::Enveloped { data } => data.len(),
        }
    }

    /// Whether the payload carries no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> From<Vec<T>> for ListPayload<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Bare(items)
    }
}
