//! The profile completion handshake.
//!
//! The issuer verifies credentials on its own and calls
//! [`AuthGate::complete_authentication`] with the verified email. From
//! there the flow is a three-state machine: authenticated, awaiting
//! profile, complete. Users with a username go straight through; first-time
//! users detour through the completion form, resumed by a continuation
//! token that survives the redirect.

use std::sync::Arc;

use crate::config::GateConfig;
use crate::continuation::ContinuationStore;
use crate::storage::{CacheStore, DataStore};
use crate::token::{BearerClaims, TokenError, TokenMinter};
use crate::userdb::UserStore;

use super::errors::CoordinationError;

/// Outcome of a completed authentication: where to send the user next.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthCompletion {
    /// Profile already complete; the location carries the minted bearer
    /// token to the downstream application
    SignedIn { location: String },
    /// Profile still missing; the location is the completion form with a
    /// fresh continuation token
    ProfilePending { location: String },
}

impl AuthCompletion {
    pub fn location(&self) -> &str {
        match self {
            Self::SignedIn { location } | Self::ProfilePending { location } => location,
        }
    }
}

/// Data needed to render the completion form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileForm {
    pub email: String,
    pub state: String,
}

/// Fields of a submitted completion form.
#[derive(Debug, Clone, Default)]
pub struct ProfileSubmission {
    pub username: String,
    pub full_name: Option<String>,
}

/// The authentication front-end, wired up once at process start.
///
/// Owns the continuation store, the user directory and the token minter;
/// holds no other state. Everything request-scoped lives on the stack of
/// the handler invoking it.
pub struct AuthGate {
    config: GateConfig,
    continuation: ContinuationStore,
    users: UserStore,
    minter: TokenMinter,
}

impl AuthGate {
    pub fn new(config: GateConfig, cache: Box<dyn CacheStore>, data: Arc<dyn DataStore>) -> Self {
        let continuation = ContinuationStore::new(cache, config.state_ttl);
        let minter = TokenMinter::new(config.token_secret.clone(), config.token_ttl);
        let users = UserStore::new(data);

        Self {
            config,
            continuation,
            users,
            minter,
        }
    }

    /// Prepare the backing stores. Call once before serving requests.
    pub async fn init(&self) -> Result<(), CoordinationError> {
        self.users.init().await?;
        Ok(())
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// The issuer's authorize endpoint with our client parameters attached;
    /// target of the entry redirect.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}",
            self.config.issuer_authorize_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
        )
    }

    /// Completion callback invoked by the identity issuer with a verified
    /// email. Ensures a directory record exists, then routes by profile
    /// state: complete profiles get a bearer token for the downstream
    /// application, incomplete ones get a continuation session and a
    /// redirect to the form.
    pub async fn complete_authentication(
        &self,
        email: &str,
    ) -> Result<AuthCompletion, CoordinationError> {
        let user = self.users.find_or_create(email).await?;

        match user.username.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(username) => {
                let token = self.minter.mint(&user.email, &user.id, username)?;
                tracing::info!("Signed in returning user {}", user.id);
                Ok(AuthCompletion::SignedIn {
                    location: self.downstream_location(&token),
                })
            }
            None => {
                let state = self.continuation.issue(&user.email).await?;
                tracing::info!("Profile completion pending for user {}", user.id);
                Ok(AuthCompletion::ProfilePending {
                    location: format!(
                        "{}?state={}",
                        self.config.profile_path,
                        urlencoding::encode(&state)
                    ),
                })
            }
        }
    }

    /// Resolve a continuation token for rendering the completion form.
    /// Idempotent: rendering the form does not consume the session.
    pub async fn profile_form(&self, state: &str) -> Result<ProfileForm, CoordinationError> {
        if state.is_empty() {
            return Err(CoordinationError::MissingState.log());
        }

        let session = self
            .continuation
            .peek(state)
            .await?
            .ok_or(CoordinationError::SessionExpired)
            .map_err(CoordinationError::log)?;

        Ok(ProfileForm {
            email: session.email,
            state: state.to_string(),
        })
    }

    /// Handle a completion form submission.
    ///
    /// Validation happens before any mutation, and the continuation token
    /// is consumed only after the profile write, the re-read and the token
    /// minting have all succeeded; a failure in between leaves the session
    /// intact so the user can simply retry. Returns the downstream redirect
    /// location carrying the bearer token.
    pub async fn submit_profile(
        &self,
        state: &str,
        submission: ProfileSubmission,
    ) -> Result<String, CoordinationError> {
        if state.is_empty() {
            return Err(CoordinationError::MissingState.log());
        }

        let session = self
            .continuation
            .peek(state)
            .await?
            .ok_or(CoordinationError::SessionExpired)
            .map_err(CoordinationError::log)?;

        let username = submission.username.trim();
        if username.is_empty() {
            return Err(
                CoordinationError::Validation("username must not be empty".to_string()).log(),
            );
        }
        let full_name = submission
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        self.users
            .update_profile(&session.email, username, full_name)
            .await?;

        let user = self
            .users
            .get_by_email(&session.email)
            .await?
            .ok_or_else(|| {
                CoordinationError::Database(format!(
                    "user record vanished after profile update for {}",
                    session.email
                ))
                .log()
            })?;
        let stored_username = user.username.as_deref().unwrap_or(username);

        let token = self.minter.mint(&user.email, &user.id, stored_username)?;

        // Consume last. If a concurrent submission won the race, the profile
        // write above was idempotent and the loser sees an expired session.
        if self.continuation.take(state).await?.is_none() {
            return Err(CoordinationError::SessionExpired.log());
        }

        tracing::info!("Profile completed for user {}", user.id);
        Ok(self.downstream_location(&token))
    }

    /// Verify a bearer token minted by this gate. The downstream
    /// application performs the same check with the shared secret.
    pub fn verify_bearer(&self, token: &str) -> Result<BearerClaims, TokenError> {
        self.minter.verify(token)
    }

    fn downstream_location(&self, token: &str) -> String {
        format!(
            "{}?token={}",
            self.config.downstream_url,
            urlencoding::encode(token)
        )
    }
}
