//! Entity resolution cache configuration.

use serde::{Deserialize, Serialize};

/// Cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Storage backend: `"memory"` (unbounded) or `"bounded"` (capacity-limited).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Maximum number of records kept by the bounded backend.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Page size used when a caller does not supply pagination.
    #[serde(default = "default_page_limit")]
    pub default_page_limit: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            max_capacity: default_max_capacity(),
            default_page_limit: default_page_limit(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_max_capacity() -> u64 {
    10000
}

fn default_page_limit() -> u32 {
    100
}
