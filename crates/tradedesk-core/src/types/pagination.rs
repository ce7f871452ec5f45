//! Limit/offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_LIMIT: u32 = 100;
/// Maximum page size accepted by the backend.
const MAX_LIMIT: u32 = 500;

/// Request parameters for paginated list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of items to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: u32,
}

impl PageRequest {
    /// Create a new page request, clamping the limit to the accepted range.
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset,
        }
    }

    /// Query pairs in the form the REST endpoints expect.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}
