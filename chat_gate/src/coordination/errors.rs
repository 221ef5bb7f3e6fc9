//! Error types for the coordination layer

use thiserror::Error;

use crate::storage::StorageError;
use crate::token::TokenError;
use crate::userdb::UserError;

/// Errors that can occur while coordinating the login flow
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// No continuation token was supplied with the request
    #[error("Missing state parameter")]
    MissingState,

    /// The continuation session is gone: expired, never existed, or
    /// already consumed
    #[error("Profile session expired or already used")]
    SessionExpired,

    /// A submitted field failed validation
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Error from the user directory
    #[error("User error: {0}")]
    User(UserError),

    /// Error from the continuation or cache storage
    #[error("Storage error: {0}")]
    Storage(StorageError),

    /// Error from bearer token minting
    #[error("Token error: {0}")]
    Token(TokenError),
}

impl CoordinationError {
    /// Whether the caller, not this service, is at fault. Client errors get
    /// their message back verbatim; everything else stays generic.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingState | Self::SessionExpired | Self::Validation(_)
        )
    }

    /// Log the error and return self, allowing for method chaining at the
    /// point where an error is raised.
    pub fn log(self) -> Self {
        if self.is_client_error() {
            tracing::debug!("{}", self);
        } else {
            tracing::error!("{}", self);
        }
        self
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        Self::User(err)
    }
}

impl From<StorageError> for CoordinationError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<TokenError> for CoordinationError {
    fn from(err: TokenError) -> Self {
        Self::Token(err)
    }
}
