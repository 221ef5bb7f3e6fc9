use crate::storage::errors::StorageError;

use super::types::{CacheStore, InMemoryCacheStore, RedisCacheStore};

/// Build a cache store from a configured kind and connection URL.
///
/// Supported kinds are `memory` (URL ignored) and `redis`. The returned
/// store has been initialized, so a redis store has already verified its
/// connection.
pub async fn build_cache_store(kind: &str, url: &str) -> Result<Box<dyn CacheStore>, StorageError> {
    tracing::info!("Initializing cache store with type: {}", kind);

    let store: Box<dyn CacheStore> = match kind {
        "memory" => Box::new(InMemoryCacheStore::new()),
        "redis" => {
            let client = redis::Client::open(url)
                .map_err(|e| StorageError::Storage(format!("Failed to create Redis client: {e}")))?;
            Box::new(RedisCacheStore { client })
        }
        t => {
            return Err(StorageError::Storage(format!(
                "Unsupported cache store type: {t}. Supported types are 'memory' and 'redis'"
            )));
        }
    };

    store.init().await?;

    tracing::info!("Connected to cache store: type={}", kind);

    Ok(store)
}
