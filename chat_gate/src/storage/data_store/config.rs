use std::str::FromStr;
use std::sync::Arc;

use crate::storage::errors::StorageError;

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};

/// Build a relational data store from a configured kind and connection URL.
///
/// Supported kinds are `sqlite` and `postgres`. Pools connect lazily, so a
/// bad URL surfaces on first use rather than here.
pub fn build_data_store(kind: &str, url: &str) -> Result<Arc<dyn DataStore>, StorageError> {
    tracing::info!("Initializing data store with type: {}", kind);

    let store: Arc<dyn DataStore> = match kind {
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(url)
                .map_err(|e| {
                    StorageError::Storage(format!("Failed to parse SQLite connection string: {e}"))
                })?
                .create_if_missing(true);

            Arc::new(SqliteDataStore {
                pool: sqlx::sqlite::SqlitePool::connect_lazy_with(opts),
            })
        }
        "postgres" => Arc::new(PostgresDataStore {
            pool: sqlx::PgPool::connect_lazy(url)
                .map_err(|e| StorageError::Storage(format!("Failed to create Postgres pool: {e}")))?,
        }),
        t => {
            return Err(StorageError::Storage(format!(
                "Unsupported data store type: {t}. Supported types are 'sqlite' and 'postgres'"
            )));
        }
    };

    tracing::info!("Connected to database: type={}", kind);

    Ok(store)
}
