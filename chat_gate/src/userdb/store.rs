use std::sync::Arc;

use chrono::Utc;

use crate::storage::DataStore;
use crate::utils::gen_random_string;

use super::errors::UserError;
use super::postgres::{
    create_tables_postgres, get_user_by_email_postgres, get_user_by_id_postgres,
    insert_user_if_absent_postgres, update_profile_postgres,
};
use super::sqlite::{
    create_tables_sqlite, get_user_by_email_sqlite, get_user_by_id_sqlite,
    insert_user_if_absent_sqlite, update_profile_sqlite,
};
use super::types::User;

/// The user directory, backed by whichever relational store was configured.
///
/// Email is the natural key. Creation is an atomic insert-or-no-op at the
/// storage layer, never a read-then-insert in application code, so two
/// devices authenticating the same new email concurrently still end up with
/// a single row.
pub struct UserStore {
    store: Arc<dyn DataStore>,
}

impl UserStore {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Create the directory tables if they do not exist yet.
    pub async fn init(&self) -> Result<(), UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            return create_tables_sqlite(pool).await;
        }
        if let Some(pool) = self.store.as_postgres() {
            return create_tables_postgres(pool).await;
        }
        Err(UserError::Storage(
            "Unsupported data store backend".to_string(),
        ))
    }

    /// Locate the record for an email, creating a profile-incomplete one on
    /// first sight. Returns the stored row either way, so the id is stable
    /// across repeated authentications.
    pub async fn find_or_create(&self, email: &str) -> Result<User, UserError> {
        if email.trim().is_empty() {
            return Err(UserError::InvalidData("email must not be empty".to_string()));
        }

        let candidate = User::new(self.gen_new_user_id().await?, email.to_string());

        if let Some(pool) = self.store.as_sqlite() {
            insert_user_if_absent_sqlite(pool, &candidate).await?;
            return get_user_by_email_sqlite(pool, email)
                .await?
                .ok_or(UserError::NotFound);
        }
        if let Some(pool) = self.store.as_postgres() {
            insert_user_if_absent_postgres(pool, &candidate).await?;
            return get_user_by_email_postgres(pool, email)
                .await?
                .ok_or(UserError::NotFound);
        }
        Err(UserError::Storage(
            "Unsupported data store backend".to_string(),
        ))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            return get_user_by_email_sqlite(pool, email).await;
        }
        if let Some(pool) = self.store.as_postgres() {
            return get_user_by_email_postgres(pool, email).await;
        }
        Err(UserError::Storage(
            "Unsupported data store backend".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            return get_user_by_id_sqlite(pool, id).await;
        }
        if let Some(pool) = self.store.as_postgres() {
            return get_user_by_id_postgres(pool, id).await;
        }
        Err(UserError::Storage(
            "Unsupported data store backend".to_string(),
        ))
    }

    /// Set username and full name on the record for an email.
    ///
    /// Writing the same values twice is harmless, which is what makes a
    /// double-submitted completion form safe.
    pub async fn update_profile(
        &self,
        email: &str,
        username: &str,
        full_name: Option<&str>,
    ) -> Result<(), UserError> {
        let now = Utc::now();

        let rows = if let Some(pool) = self.store.as_sqlite() {
            update_profile_sqlite(pool, email, username, full_name, now).await?
        } else if let Some(pool) = self.store.as_postgres() {
            update_profile_postgres(pool, email, username, full_name, now).await?
        } else {
            return Err(UserError::Storage(
                "Unsupported data store backend".to_string(),
            ));
        };

        if rows == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    /// Generate a directory-unique random id, retrying on the astronomically
    /// unlikely collision.
    async fn gen_new_user_id(&self) -> Result<String, UserError> {
        for _ in 0..3 {
            let id = gen_random_string(32).map_err(|e| UserError::Storage(e.to_string()))?;

            match self.get_by_id(&id).await? {
                None => return Ok(id),
                Some(_) => continue,
            }
        }
        Err(UserError::Storage(
            "Failed to generate a unique user id".to_string(),
        ))
    }
}
