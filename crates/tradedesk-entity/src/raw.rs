//! Untyped records as list endpoints return them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record exactly as a list endpoint returned it.
///
/// Field names differ between endpoints and backend versions, so the raw
/// object is kept as-is until it is normalized into a canonical record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Map<String, Value>);

impl RawRecord {
    /// Return the first non-null value among `keys`, in order.
    pub fn first_of(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}
