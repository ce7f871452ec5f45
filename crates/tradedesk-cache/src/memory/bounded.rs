//! Capacity-limited store using the moka crate.

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::store::RecordStore;

/// Record store that evicts least-recently-used entries past `max_capacity`.
///
/// No time-based expiry is configured; entries only leave through eviction
/// or [`clear`](RecordStore::clear).
#[derive(Debug, Clone)]
pub struct BoundedRecordStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    cache: Cache<String, V>,
}

impl<V> BoundedRecordStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a store holding at most `max_capacity` records.
    pub fn new(max_capacity: u64) -> Self {
        debug!(max_capacity, "building bounded record store");
        Self {
            cache: Cache::builder().max_capacity(max_capacity).build(),
        }
    }
}

#[async_trait]
impl<V> RecordStore<V> for BoundedRecordStore<V>
where
    V: Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        self.cache.get(key).await
    }

    async fn insert(&self, key: String, value: V) {
        self.cache.insert(key, value).await;
    }

    async fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}
