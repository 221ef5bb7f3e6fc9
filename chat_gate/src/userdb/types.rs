use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user record in the directory.
///
/// A record is created on first successful authentication with only the
/// email filled in; `username` and `full_name` arrive later through the
/// profile completion form. A user with no username has not finished
/// signing up yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Server-generated identifier, immutable once assigned
    pub id: String,
    /// Login identity, unique, stored case-sensitively
    pub email: String,
    /// Chosen handle, absent until profile completion
    pub username: Option<String>,
    /// Optional display name
    pub full_name: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh, profile-incomplete record for an email.
    pub fn new(id: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            username: None,
            full_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user has completed the one-time profile step.
    pub fn has_completed_profile(&self) -> bool {
        self.username
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}
