//! Like relation and playlist like-count rollup
//!
//! `likes_count` on a playlist is a point-in-time cache: it is adjusted only
//! at the instant of a like or unlike, over the playlists containing the
//! track at that moment. Later membership changes do not correct it.

use crate::{datetime_from_ts, tracks};
use mixtape_core::error::{MixtapeError, Result};
use mixtape_core::types::{Like, LikeOutcome, TrackId, UserId};
use sqlx::{Row, SqlitePool};

/// Like a track
///
/// Idempotent: an existing like reports [`LikeOutcome::AlreadyLiked`] and
/// changes nothing. A new like commits together with the like-count
/// increment on every playlist currently containing the track.
pub async fn like(pool: &SqlitePool, user_id: UserId, track_id: TrackId) -> Result<LikeOutcome> {
    if tracks::get_by_id(pool, track_id).await?.is_none() {
        return Err(MixtapeError::not_found("Track", track_id));
    }

    let mut tx = pool.begin().await?;

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM likes WHERE user_id = ? AND track_id = ?")
            .bind(user_id)
            .bind(track_id)
            .fetch_optional(&mut *tx)
            .await?;
    if existing.is_some() {
        return Ok(LikeOutcome::AlreadyLiked);
    }

    sqlx::query("INSERT INTO likes (user_id, track_id, created_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(track_id)
        .bind(chrono::Utc::now().timestamp())
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "UPDATE playlists SET likes_count = likes_count + 1
         WHERE id IN (SELECT playlist_id FROM playlist_tracks WHERE track_id = ?)",
    )
    .bind(track_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(LikeOutcome::Liked)
}

/// Remove a like
///
/// Deletes the like and decrements the like-count, floored at zero, on
/// every playlist currently containing the track, in one transaction.
pub async fn unlike(pool: &SqlitePool, user_id: UserId, track_id: TrackId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM likes WHERE user_id = ? AND track_id = ?")
        .bind(user_id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("Like", track_id));
    }

    sqlx::query(
        "UPDATE playlists SET likes_count = MAX(likes_count - 1, 0)
         WHERE id IN (SELECT playlist_id FROM playlist_tracks WHERE track_id = ?)",
    )
    .bind(track_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}

/// Get all likes held by a user, newest first
pub async fn get_for_user(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Like>> {
    let rows = sqlx::query(
        "SELECT user_id, track_id, created_at FROM likes
         WHERE user_id = ?
         ORDER BY created_at DESC, track_id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(Like {
                user_id: row.get("user_id"),
                track_id: row.get("track_id"),
                created_at: datetime_from_ts(row.get::<i64, _>("created_at"))?,
            })
        })
        .collect()
}
