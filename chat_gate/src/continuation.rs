//! Short-lived, single-use continuation sessions.
//!
//! A continuation token lets the profile completion form survive a redirect
//! round trip without any client-side state: the token rides along as a
//! query parameter, the email it stands for stays server-side. A token is
//! valid for exactly one successful take or until its TTL elapses,
//! whichever comes first.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::storage::{CacheData, CacheStore, StorageError};
use crate::utils::gen_random_string;

const PROFILE_STATE_PREFIX: &str = "profile_state";

/// What a continuation token stands for: an email mid-way through
/// completing its profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileSession {
    pub email: String,
}

pub struct ContinuationStore {
    cache: Mutex<Box<dyn CacheStore>>,
    ttl: u64,
}

impl ContinuationStore {
    pub fn new(cache: Box<dyn CacheStore>, ttl: u64) -> Self {
        Self {
            cache: Mutex::new(cache),
            ttl,
        }
    }

    /// Create a fresh continuation session for an email and return its token.
    pub async fn issue(&self, email: &str) -> Result<String, StorageError> {
        let token = gen_random_string(32).map_err(|e| StorageError::Storage(e.to_string()))?;

        let session = ProfileSession {
            email: email.to_string(),
        };
        let value = CacheData {
            value: serde_json::to_string(&session)?,
        };

        self.cache
            .lock()
            .await
            .put_with_ttl(PROFILE_STATE_PREFIX, &token, value, self.ttl)
            .await?;

        tracing::debug!("Issued continuation session for {}", email);
        Ok(token)
    }

    /// Look up a session without consuming it. Used by the idempotent form
    /// render and by submission validation that must not burn the token.
    pub async fn peek(&self, token: &str) -> Result<Option<ProfileSession>, StorageError> {
        let data = self
            .cache
            .lock()
            .await
            .get(PROFILE_STATE_PREFIX, token)
            .await?;

        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data.value)?)),
            None => Ok(None),
        }
    }

    /// Consume a session: at most one caller ever gets the value back.
    pub async fn take(&self, token: &str) -> Result<Option<ProfileSession>, StorageError> {
        let data = self
            .cache
            .lock()
            .await
            .take(PROFILE_STATE_PREFIX, token)
            .await?;

        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data.value)?)),
            None => Ok(None),
        }
    }
}
