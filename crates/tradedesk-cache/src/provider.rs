//! Store construction from configuration.

use std::sync::Arc;

use tracing::info;

use tradedesk_core::config::cache::CacheConfig;
use tradedesk_core::error::AppError;
use tradedesk_core::result::AppResult;

use crate::store::RecordStore;

/// Build the record store selected by `config.provider`.
pub fn build_store<V>(config: &CacheConfig) -> AppResult<Arc<dyn RecordStore<V>>>
where
    V: Clone + Send + Sync + std::fmt::Debug + 'static,
{
    let store: Arc<dyn RecordStore<V>> = match config.provider.as_str() {
        #[cfg(feature = "memory")]
        "memory" => {
            info!("Initializing unbounded in-memory record store");
            Arc::new(crate::memory::MemoryRecordStore::new())
        }
        #[cfg(feature = "bounded")]
        "bounded" => {
            info!(
                max_capacity = config.max_capacity,
                "Initializing bounded record store"
            );
            Arc::new(crate::memory::BoundedRecordStore::new(config.max_capacity))
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown cache provider: '{other}'. Supported: memory, bounded"
            )));
        }
    };

    Ok(store)
}
