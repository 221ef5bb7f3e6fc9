mod config;
mod types;

pub use config::build_data_store;
pub use types::{DataStore, PostgresDataStore, SqliteDataStore};
