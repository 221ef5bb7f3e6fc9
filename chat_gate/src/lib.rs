//! chat-gate - Login front-end coordination for a chat application
//!
//! This crate holds the server-side pieces of the login flow: the user
//! directory, the single-use continuation sessions that carry a user
//! through profile completion, the bearer token minter for the downstream
//! application, and the handshake that ties them together. Credential
//! verification itself belongs to an external identity issuer, which calls
//! back into [`AuthGate::complete_authentication`] with a verified email.

mod config;
mod continuation;
mod coordination;
mod storage;
mod token;
mod userdb;
mod utils;

pub use config::{
    ConfigError, DEFAULT_PROFILE_PATH, DEFAULT_STATE_TTL, DEFAULT_TOKEN_TTL, GateConfig,
};
pub use continuation::{ContinuationStore, ProfileSession};
pub use coordination::{
    AuthCompletion, AuthGate, CoordinationError, ProfileForm, ProfileSubmission,
};
pub use storage::{
    CacheData, CacheStore, DataStore, InMemoryCacheStore, PostgresDataStore, RedisCacheStore,
    SqliteDataStore, StorageError, build_cache_store, build_data_store,
};
pub use token::{BearerClaims, TokenError, TokenMinter};
pub use userdb::{User, UserError, UserStore};
pub use utils::{UtilError, gen_random_string};
