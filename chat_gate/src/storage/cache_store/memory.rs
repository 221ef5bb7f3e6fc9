use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{CacheStore, InMemoryCacheStore};

impl InMemoryCacheStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory cache store");
        Self {
            entry: HashMap::new(),
        }
    }

    fn make_key(prefix: &str, key: &str) -> String {
        format!("{prefix}:{key}")
    }

    fn is_live(entry: &(CacheData, Option<Instant>)) -> bool {
        match entry.1 {
            Some(expires_at) => Instant::now() < expires_at,
            None => true,
        }
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: u64,
    ) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        let expires_at = (ttl > 0).then(|| Instant::now() + Duration::from_secs(ttl));
        self.entry.insert(key, (value, expires_at));
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(prefix, key);
        Ok(self
            .entry
            .get(&key)
            .filter(|entry| Self::is_live(entry))
            .map(|(value, _)| value.clone()))
    }

    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        self.entry.remove(&key);
        Ok(())
    }

    async fn take(&mut self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(prefix, key);
        Ok(self
            .entry
            .remove(&key)
            .filter(|entry| Self::is_live(entry))
            .map(|(value, _)| value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(value: &str) -> CacheData {
        CacheData {
            value: value.to_string(),
        }
    }

    #[test]
    fn test_make_key() {
        // Given a prefix and key
        let result = InMemoryCacheStore::make_key("profile_state", "token123");

        // Then it should be formatted correctly
        assert_eq!(result, "profile_state:token123");
    }

    #[tokio::test]
    async fn test_put_and_get() {
        // Given an in-memory cache store with a stored value
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("test", "key1", data("stored"), 60)
            .await
            .expect("put should succeed");

        // When getting the value
        let retrieved = store.get("test", "key1").await.expect("get should succeed");

        // Then it should return the stored value
        assert_eq!(retrieved.expect("value should exist").value, "stored");
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        // Given an empty in-memory cache store
        let store = InMemoryCacheStore::new();

        // When getting a non-existent key
        let retrieved = store
            .get("test", "nonexistent")
            .await
            .expect("get should succeed");

        // Then it should return None without error
        assert!(retrieved.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        // Given a value stored with a one-second TTL
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("test", "short", data("gone soon"), 1)
            .await
            .expect("put should succeed");

        // When the TTL elapses
        tokio::time::sleep(Duration::from_millis(1100)).await;

        // Then both get and take report the entry as absent
        assert!(store.get("test", "short").await.unwrap().is_none());
        assert!(store.take("test", "short").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_means_no_expiry() {
        // Given a value stored with TTL zero
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("test", "keep", data("kept"), 0)
            .await
            .expect("put should succeed");

        // Then it stays readable
        assert!(store.get("test", "keep").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_take_is_single_use() {
        // Given a stored value
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("test", "once", data("single use"), 60)
            .await
            .expect("put should succeed");

        // When taking it twice
        let first = store.take("test", "once").await.expect("take should succeed");
        let second = store.take("test", "once").await.expect("take should succeed");

        // Then only the first take observes the value
        assert_eq!(first.expect("first take should win").value, "single use");
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        // Given a stored value
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("test", "key3", data("value to remove"), 60)
            .await
            .expect("put should succeed");

        // When removing it
        store
            .remove("test", "key3")
            .await
            .expect("remove should succeed");

        // Then it is gone
        assert!(store.get("test", "key3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_nonexistent_key() {
        // Removing a non-existent key should succeed without error
        let mut store = InMemoryCacheStore::new();
        assert!(store.remove("test", "nonexistent").await.is_ok());
    }

    #[tokio::test]
    async fn test_overwrite_existing_key() {
        // Given an existing value
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("test", "key1", data("original"), 60)
            .await
            .expect("put should succeed");

        // When overwriting it
        store
            .put_with_ttl("test", "key1", data("updated"), 60)
            .await
            .expect("put should succeed");

        // Then the retrieved value is the new one
        let retrieved = store.get("test", "key1").await.unwrap().unwrap();
        assert_eq!(retrieved.value, "updated");
    }

    #[tokio::test]
    async fn test_prefix_isolation() {
        // Given values stored with different prefixes but the same key
        let mut store = InMemoryCacheStore::new();
        store
            .put_with_ttl("prefix1", "shared", data("one"), 60)
            .await
            .expect("put should succeed");
        store
            .put_with_ttl("prefix2", "shared", data("two"), 60)
            .await
            .expect("put should succeed");

        // Then each prefix resolves to its own value
        assert_eq!(store.get("prefix1", "shared").await.unwrap().unwrap().value, "one");
        assert_eq!(store.get("prefix2", "shared").await.unwrap().unwrap().value, "two");

        // And removing one leaves the other untouched
        store.remove("prefix1", "shared").await.unwrap();
        assert!(store.get("prefix1", "shared").await.unwrap().is_none());
        assert!(store.get("prefix2", "shared").await.unwrap().is_some());
    }
}
