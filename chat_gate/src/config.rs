//! Gate configuration.
//!
//! Everything the front-end needs is collected into one explicit struct
//! built at process start and passed by reference; there are no
//! module-scope singletons to initialize or reset.

use std::env;

use thiserror::Error;

/// How long an unconsumed continuation session lives, in seconds.
pub const DEFAULT_STATE_TTL: u64 = 600;

/// Default bearer token lifetime, in seconds.
pub const DEFAULT_TOKEN_TTL: i64 = 3600;

/// Path of the profile completion form served by the router.
pub const DEFAULT_PROFILE_PATH: &str = "/complete-profile";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

/// Static configuration for the authentication front-end.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Base URL of the downstream chat application; the minted bearer token
    /// is appended as a `token` query parameter
    pub downstream_url: String,
    /// The external issuer's authorize endpoint, target of the entry redirect
    pub issuer_authorize_url: String,
    /// Client identifier presented to the issuer
    pub client_id: String,
    /// Redirect URI registered with the issuer
    pub redirect_uri: String,
    /// Path of the profile completion form
    pub profile_path: String,
    /// Continuation session TTL in seconds
    pub state_ttl: u64,
    /// Shared secret for bearer token signing
    pub token_secret: Vec<u8>,
    /// Bearer token lifetime in seconds
    pub token_ttl: i64,
}

impl GateConfig {
    /// Read configuration from the environment.
    ///
    /// Required: `CHAT_DOWNSTREAM_URL`, `CHAT_ISSUER_AUTHORIZE_URL`,
    /// `CHAT_CLIENT_ID`, `CHAT_REDIRECT_URI`, `CHAT_TOKEN_SECRET`.
    /// Optional: `CHAT_STATE_TTL` (default 600), `CHAT_TOKEN_TTL`
    /// (default 3600).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            downstream_url: require("CHAT_DOWNSTREAM_URL")?,
            issuer_authorize_url: require("CHAT_ISSUER_AUTHORIZE_URL")?,
            client_id: require("CHAT_CLIENT_ID")?,
            redirect_uri: require("CHAT_REDIRECT_URI")?,
            profile_path: DEFAULT_PROFILE_PATH.to_string(),
            state_ttl: optional_parsed("CHAT_STATE_TTL", DEFAULT_STATE_TTL)?,
            token_secret: require("CHAT_TOKEN_SECRET")?.into_bytes(),
            token_ttl: optional_parsed("CHAT_TOKEN_TTL", DEFAULT_TOKEN_TTL)?,
        })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn optional_parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(key, e.to_string())),
        Err(_) => Ok(default),
    }
}
