use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use super::DB_TABLE_USERS;
use super::errors::UserError;
use super::types::User;

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL UNIQUE,
            username TEXT,
            full_name TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
        DB_TABLE_USERS
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

/// Insert a new record unless one already exists for the email. The conflict
/// target is the email column, so two racing first logins leave one row.
pub(super) async fn insert_user_if_absent_sqlite(
    pool: &Pool<Sqlite>,
    user: &User,
) -> Result<(), UserError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {} (id, email, username, full_name, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (email) DO NOTHING
        "#,
        DB_TABLE_USERS
    ))
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.full_name)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_user_by_email_sqlite(
    pool: &Pool<Sqlite>,
    email: &str,
) -> Result<Option<User>, UserError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT id, email, username, full_name, created_at, updated_at
        FROM {} WHERE email = ?
        "#,
        DB_TABLE_USERS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_user_by_id_sqlite(
    pool: &Pool<Sqlite>,
    id: &str,
) -> Result<Option<User>, UserError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT id, email, username, full_name, created_at, updated_at
        FROM {} WHERE id = ?
        "#,
        DB_TABLE_USERS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn update_profile_sqlite(
    pool: &Pool<Sqlite>,
    email: &str,
    username: &str,
    full_name: Option<&str>,
    updated_at: DateTime<Utc>,
) -> Result<u64, UserError> {
    let result = sqlx::query(&format!(
        r#"
        UPDATE {} SET username = ?, full_name = ?, updated_at = ?
        WHERE email = ?
        "#,
        DB_TABLE_USERS
    ))
    .bind(username)
    .bind(full_name)
    .bind(updated_at)
    .bind(email)
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(result.rows_affected())
}
