//! Storage trait behind the entity resolution cache.

use async_trait::async_trait;

/// A keyed map of immutable record snapshots.
///
/// Writes are last-write-wins per key. Implementations hand out clones;
/// callers never get a handle into the stored value.
#[async_trait]
pub trait RecordStore<V>: Send + Sync + std::fmt::Debug + 'static
where
    V: Clone + Send + Sync + 'static,
{
    /// Get a record by key.
    async fn get(&self, key: &str) -> Option<V>;

    /// Insert or overwrite a record.
    async fn insert(&self, key: String, value: V);

    /// Insert or overwrite a batch of records, in order.
    async fn insert_many(&self, entries: Vec<(String, V)>) {
        for (key, value) in entries {
            self.insert(key, value).await;
        }
    }

    /// Check whether a key is present.
    async fn contains(&self, key: &str) -> bool;

    /// Number of stored records.
    async fn len(&self) -> u64;

    /// Drop every record.
    async fn clear(&self);
}
