//! Collaborator grant management
//!
//! Adding and removing collaborators is restricted to the playlist's true
//! owner; editors cannot manage other collaborators.

use crate::{datetime_from_ts, playlists, users};
use mixtape_core::error::{MixtapeError, Result};
use mixtape_core::types::{Collaborator, CollaboratorRole, PlaylistId, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn collaborator_from_row(row: &SqliteRow) -> Result<Collaborator> {
    let role_str = row.get::<String, _>("role");
    let role = CollaboratorRole::parse(&role_str)
        .ok_or_else(|| MixtapeError::Database(format!("Invalid role: {role_str}")))?;

    Ok(Collaborator {
        playlist_id: row.get("playlist_id"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        role,
        added_at: datetime_from_ts(row.get::<i64, _>("added_at"))?,
    })
}

/// List a playlist's collaborator grants with usernames
pub async fn list(pool: &SqlitePool, playlist_id: PlaylistId) -> Result<Vec<Collaborator>> {
    let rows = sqlx::query(
        "SELECT pc.playlist_id, pc.user_id, pc.role, pc.added_at, u.username
         FROM playlist_collaborators pc
         INNER JOIN users u ON pc.user_id = u.id
         WHERE pc.playlist_id = ?
         ORDER BY pc.added_at, pc.user_id",
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(collaborator_from_row).collect()
}

/// Get a single grant
pub async fn get(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<Option<Collaborator>> {
    let row = sqlx::query(
        "SELECT pc.playlist_id, pc.user_id, pc.role, pc.added_at, u.username
         FROM playlist_collaborators pc
         INNER JOIN users u ON pc.user_id = u.id
         WHERE pc.playlist_id = ? AND pc.user_id = ?",
    )
    .bind(playlist_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(collaborator_from_row).transpose()
}

/// Grant a role to a user by username (owner-only)
///
/// Re-adding an existing collaborator overwrites the role rather than
/// duplicating the grant. The owner cannot be added as a collaborator.
pub async fn add(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    username: &str,
    role: CollaboratorRole,
    acting_user: UserId,
) -> Result<Collaborator> {
    let playlist = playlists::get_by_id(pool, playlist_id)
        .await?
        .ok_or_else(|| MixtapeError::not_found("Playlist", playlist_id))?;

    if playlist.owner_id != acting_user {
        return Err(MixtapeError::PermissionDenied);
    }

    let user = users::find_by_username(pool, username)
        .await?
        .ok_or_else(|| MixtapeError::not_found("User", username))?;

    if user.id == playlist.owner_id {
        return Err(MixtapeError::validation("user is the playlist owner"));
    }

    sqlx::query(
        "INSERT INTO playlist_collaborators (playlist_id, user_id, role, added_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(playlist_id, user_id) DO UPDATE SET role = excluded.role",
    )
    .bind(playlist_id)
    .bind(user.id)
    .bind(role.as_str())
    .bind(chrono::Utc::now().timestamp())
    .execute(pool)
    .await?;

    get(pool, playlist_id, user.id)
        .await?
        .ok_or_else(|| MixtapeError::Database("Failed to retrieve created grant".to_string()))
}

/// Revoke a grant (owner-only)
pub async fn remove(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    user_id: UserId,
    acting_user: UserId,
) -> Result<()> {
    let playlist = playlists::get_by_id(pool, playlist_id)
        .await?
        .ok_or_else(|| MixtapeError::not_found("Playlist", playlist_id))?;

    if playlist.owner_id != acting_user {
        return Err(MixtapeError::PermissionDenied);
    }

    let result =
        sqlx::query("DELETE FROM playlist_collaborators WHERE playlist_id = ? AND user_id = ?")
            .bind(playlist_id)
            .bind(user_id)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("Collaborator", user_id));
    }

    Ok(())
}
