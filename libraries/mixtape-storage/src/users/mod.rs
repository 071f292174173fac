//! User registration and credential queries

use crate::datetime_from_ts;
use mixtape_core::error::{MixtapeError, Result};
use mixtape_core::types::{CreateUser, User, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        created_at: datetime_from_ts(row.get::<i64, _>("created_at"))?,
    })
}

/// Register a new user with credentials
///
/// The user row and credential row commit in one transaction. The password
/// hash must already be hashed by the caller (bcrypt at the server layer).
pub async fn create_with_password(
    pool: &SqlitePool,
    user: CreateUser,
    password_hash: &str,
) -> Result<User> {
    let username = user.username.trim();
    let email = user.email.trim();
    if username.is_empty() || email.is_empty() {
        return Err(MixtapeError::validation("username and email are required"));
    }

    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let result = sqlx::query("INSERT INTO users (username, email, created_at) VALUES (?, ?, ?)")
        .bind(username)
        .bind(email)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                MixtapeError::conflict("username or email already taken")
            }
            _ => MixtapeError::from(e),
        })?;

    let id = result.last_insert_rowid();

    sqlx::query("INSERT INTO user_credentials (user_id, password_hash, updated_at) VALUES (?, ?, ?)")
        .bind(id)
        .bind(password_hash)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::Database("Failed to retrieve created user".to_string()))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, username, email, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Find user by unique handle
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, username, email, created_at FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, username, email, created_at FROM users ORDER BY username")
        .fetch_all(pool)
        .await?;

    rows.iter().map(user_from_row).collect()
}

/// Get a user's password hash for authentication
///
/// Returns `None` if the user has no credentials.
pub async fn get_password_hash(pool: &SqlitePool, user_id: UserId) -> Result<Option<String>> {
    let hash: Option<String> =
        sqlx::query_scalar("SELECT password_hash FROM user_credentials WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(hash)
}

/// Create or update a user's password hash
pub async fn set_password_hash(
    pool: &SqlitePool,
    user_id: UserId,
    password_hash: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO user_credentials (user_id, password_hash, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(user_id)
         DO UPDATE SET password_hash = excluded.password_hash, updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(password_hash)
    .bind(chrono::Utc::now().timestamp())
    .execute(pool)
    .await?;

    Ok(())
}
