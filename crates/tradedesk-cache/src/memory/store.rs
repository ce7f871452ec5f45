//! Unbounded in-memory store using dashmap.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::store::RecordStore;

/// Unbounded record store; entries live until [`clear`](RecordStore::clear).
#[derive(Debug)]
pub struct MemoryRecordStore<V> {
    entries: DashMap<String, V>,
}

impl<V> MemoryRecordStore<V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<V> Default for MemoryRecordStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> RecordStore<V> for MemoryRecordStore<V>
where
    V: Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    async fn insert(&self, key: String, value: V) {
        self.entries.insert(key, value);
    }

    async fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    async fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    async fn clear(&self) {
        self.entries.clear();
    }
}
