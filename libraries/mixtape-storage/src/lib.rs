//! Mixtape Storage
//!
//! `SQLite` database layer for Mixtape.
//!
//! This crate provides persistent storage for users, tracks, playlists,
//! mood tags, and likes, organized as vertical slices: each feature module
//! owns its own queries and logic.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = mixtape_storage::create_pool("sqlite://mixtape.db").await?;
//! mixtape_storage::run_migrations(&pool).await?;
//!
//! let playlists = mixtape_storage::playlists::list_visible(&pool, None, None).await?;
//! # Ok(())
//! # }
//! ```

// Vertical slices
pub mod collaborators;
pub mod likes;
pub mod moods;
pub mod playlists;
pub mod tracks;
pub mod users;

use chrono::{DateTime, Utc};
use mixtape_core::error::MixtapeError;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://mixtape.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true) // cascade deletes depend on FK enforcement
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Convert a stored unix timestamp into a `DateTime<Utc>`
pub(crate) fn datetime_from_ts(ts: i64) -> Result<DateTime<Utc>, MixtapeError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| MixtapeError::Database(format!("Invalid timestamp: {ts}")))
}
