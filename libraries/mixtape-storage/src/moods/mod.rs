//! Mood tag vocabulary and playlist tagging

use crate::playlists;
use mixtape_core::error::{MixtapeError, Result};
use mixtape_core::types::{MoodTag, PlaylistId, UserId};
use sqlx::{Row, SqlitePool};

/// Get the whole mood vocabulary, ordered by name
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<MoodTag>> {
    let rows = sqlx::query("SELECT id, name FROM mood_tags ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| MoodTag {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect())
}

/// Find a mood tag by name, creating it if absent
pub async fn find_or_create(pool: &SqlitePool, name: &str) -> Result<MoodTag> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MixtapeError::validation("mood name is required"));
    }

    let row = sqlx::query("SELECT id, name FROM mood_tags WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    if let Some(row) = row {
        return Ok(MoodTag {
            id: row.get("id"),
            name: row.get("name"),
        });
    }

    let result = sqlx::query("INSERT INTO mood_tags (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(MoodTag {
        id: result.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Replace a playlist's mood tag set (owner-only)
pub async fn set_for_playlist(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    names: &[String],
    acting_user: UserId,
) -> Result<Vec<MoodTag>> {
    let playlist = playlists::get_by_id(pool, playlist_id)
        .await?
        .ok_or_else(|| MixtapeError::not_found("Playlist", playlist_id))?;

    if playlist.owner_id != acting_user {
        return Err(MixtapeError::PermissionDenied);
    }

    let mut tags = Vec::with_capacity(names.len());
    for name in names {
        if name.trim().is_empty() {
            continue;
        }
        tags.push(find_or_create(pool, name).await?);
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM playlist_moods WHERE playlist_id = ?")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

    for tag in &tags {
        sqlx::query(
            "INSERT INTO playlist_moods (playlist_id, mood_tag_id) VALUES (?, ?)
             ON CONFLICT(playlist_id, mood_tag_id) DO NOTHING",
        )
        .bind(playlist_id)
        .bind(tag.id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(tags)
}
