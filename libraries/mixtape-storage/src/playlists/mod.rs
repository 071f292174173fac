//! Playlist directory and membership ledger
//!
//! Track membership mutations are gated by [`can_edit`] (owner or
//! editor/owner-delegate grant). Playlist metadata edits and deletion are
//! owner-only. Multi-step mutations run inside a single transaction.

use crate::datetime_from_ts;
use mixtape_core::error::{MixtapeError, Result};
use mixtape_core::types::{
    CreatePlaylist, MoodTag, Playlist, PlaylistEntry, PlaylistId, TrackId, UpdatePlaylist, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const PLAYLIST_COLUMNS: &str = "id, title, description, cover_url, is_public, owner_id, \
     created_at, updated_at, likes_count";

fn playlist_from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        cover_url: row.get("cover_url"),
        is_public: row.get::<i64, _>("is_public") != 0,
        owner_id: row.get("owner_id"),
        created_at: datetime_from_ts(row.get::<i64, _>("created_at"))?,
        updated_at: datetime_from_ts(row.get::<i64, _>("updated_at"))?,
        likes_count: row.get("likes_count"),
        tracks: None,
        moods: None,
    })
}

/// Create a new playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    if playlist.title.trim().is_empty() {
        return Err(MixtapeError::validation("title is required"));
    }

    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO playlists (title, description, cover_url, is_public, owner_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&playlist.title)
    .bind(&playlist.description)
    .bind(&playlist.cover_url)
    .bind(i64::from(playlist.is_public))
    .bind(playlist.owner_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::Database("Failed to retrieve created playlist".to_string()))
}

/// Get playlist by ID (metadata only)
pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(playlist_from_row).transpose()
}

/// Get playlist with membership entries and mood tags
///
/// Entries come back ordered by position ascending, ties broken by
/// insertion order.
pub async fn get_with_tracks(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let Some(mut playlist) = get_by_id(pool, id).await? else {
        return Ok(None);
    };

    let entry_rows = sqlx::query(
        "SELECT pt.track_id, pt.position, pt.added_by_user_id, pt.added_at,
                t.title, t.artist, t.cover_url
         FROM playlist_tracks pt
         INNER JOIN tracks t ON pt.track_id = t.id
         WHERE pt.playlist_id = ?
         ORDER BY pt.position, pt.rowid",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let entries = entry_rows
        .iter()
        .map(|row| {
            Ok(PlaylistEntry {
                track_id: row.get("track_id"),
                position: row.get("position"),
                added_by_user_id: row.get("added_by_user_id"),
                added_at: datetime_from_ts(row.get::<i64, _>("added_at"))?,
                title: row.get("title"),
                artist: row.get("artist"),
                cover_url: row.get("cover_url"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mood_rows = sqlx::query(
        "SELECT m.id, m.name FROM mood_tags m
         INNER JOIN playlist_moods pm ON pm.mood_tag_id = m.id
         WHERE pm.playlist_id = ?
         ORDER BY m.name",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let moods = mood_rows
        .iter()
        .map(|row| MoodTag {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect();

    playlist.tracks = Some(entries);
    playlist.moods = Some(moods);

    Ok(Some(playlist))
}

/// List playlists visible to a viewer: public ones plus the viewer's own,
/// optionally filtered to playlists carrying any of the given mood tags.
/// Newest first.
pub async fn list_visible(
    pool: &SqlitePool,
    viewer: Option<UserId>,
    mood_names: Option<&[String]>,
) -> Result<Vec<Playlist>> {
    let mut sql = format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists
         WHERE (is_public = 1 OR owner_id = ?)"
    );

    if let Some(names) = mood_names {
        let placeholders = vec!["?"; names.len()].join(", ");
        sql.push_str(&format!(
            " AND id IN (SELECT pm.playlist_id FROM playlist_moods pm
                         INNER JOIN mood_tags m ON pm.mood_tag_id = m.id
                         WHERE m.name IN ({placeholders}))"
        ));
    }

    sql.push_str(" ORDER BY created_at DESC, id DESC");

    // Anonymous viewers only see public playlists; no user has id -1.
    let mut query = sqlx::query(&sql).bind(viewer.unwrap_or(-1));
    if let Some(names) = mood_names {
        for name in names {
            query = query.bind(name);
        }
    }

    let rows = query.fetch_all(pool).await?;
    rows.iter().map(playlist_from_row).collect()
}

/// Update playlist metadata (owner-only, partial)
///
/// `None` leaves a field unchanged, so `description` and `cover_url`
/// cannot be cleared back to null through this path; send a new value
/// instead.
pub async fn update(
    pool: &SqlitePool,
    id: PlaylistId,
    changes: UpdatePlaylist,
    acting_user: UserId,
) -> Result<Playlist> {
    let playlist = get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::not_found("Playlist", id))?;

    if playlist.owner_id != acting_user {
        return Err(MixtapeError::PermissionDenied);
    }

    if let Some(title) = &changes.title {
        if title.trim().is_empty() {
            return Err(MixtapeError::validation("title cannot be empty"));
        }
    }

    sqlx::query(
        "UPDATE playlists
         SET title = ?, description = ?, cover_url = ?, is_public = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(changes.title.unwrap_or(playlist.title))
    .bind(changes.description.or(playlist.description))
    .bind(changes.cover_url.or(playlist.cover_url))
    .bind(i64::from(changes.is_public.unwrap_or(playlist.is_public)))
    .bind(chrono::Utc::now().timestamp())
    .bind(id)
    .execute(pool)
    .await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::Database("Failed to retrieve updated playlist".to_string()))
}

/// Delete a playlist (owner-only)
///
/// Membership entries, collaborator grants, and mood links cascade.
pub async fn delete(pool: &SqlitePool, id: PlaylistId, acting_user: UserId) -> Result<()> {
    let playlist = get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::not_found("Playlist", id))?;

    if playlist.owner_id != acting_user {
        return Err(MixtapeError::PermissionDenied);
    }

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Access control resolver for track-membership mutations
///
/// True iff the user is the playlist's owner or holds an editor or
/// owner-delegate grant. A viewer grant, no grant, or a missing playlist
/// resolves to false. Pure read, no side effects.
pub async fn can_edit(pool: &SqlitePool, playlist_id: PlaylistId, user_id: UserId) -> Result<bool> {
    let row = sqlx::query(
        "SELECT
            CASE
                WHEN p.owner_id = ? THEN 1
                WHEN pc.role IN ('editor', 'owner') THEN 1
                ELSE 0
            END AS allowed
         FROM playlists p
         LEFT JOIN playlist_collaborators pc
             ON p.id = pc.playlist_id AND pc.user_id = ?
         WHERE p.id = ?
         LIMIT 1",
    )
    .bind(user_id)
    .bind(user_id)
    .bind(playlist_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.get::<i64, _>("allowed") == 1).unwrap_or(false))
}

/// Resolve edit rights or fail: missing playlist beats permission denial
pub async fn require_editable(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<()> {
    if get_by_id(pool, playlist_id).await?.is_none() {
        return Err(MixtapeError::not_found("Playlist", playlist_id));
    }
    if !can_edit(pool, playlist_id, user_id).await? {
        return Err(MixtapeError::PermissionDenied);
    }
    Ok(())
}

/// Add a track to a playlist
///
/// The new entry takes position max(existing)+1, or 0 for an empty
/// playlist. Adding a track already present is a conflict.
pub async fn add_track(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    track_id: TrackId,
    acting_user: UserId,
) -> Result<()> {
    require_editable(pool, playlist_id, acting_user).await?;

    if crate::tracks::get_by_id(pool, track_id).await?.is_none() {
        return Err(MixtapeError::not_found("Track", track_id));
    }

    let mut tx = pool.begin().await?;

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
            .bind(playlist_id)
            .bind(track_id)
            .fetch_optional(&mut *tx)
            .await?;
    if existing.is_some() {
        return Err(MixtapeError::conflict("track already in playlist"));
    }

    let max_position: Option<i64> =
        sqlx::query_scalar("SELECT MAX(position) FROM playlist_tracks WHERE playlist_id = ?")
            .bind(playlist_id)
            .fetch_one(&mut *tx)
            .await?;
    let position = max_position.map_or(0, |p| p + 1);

    sqlx::query(
        "INSERT INTO playlist_tracks (playlist_id, track_id, position, added_by_user_id, added_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(playlist_id)
    .bind(track_id)
    .bind(position)
    .bind(acting_user)
    .bind(chrono::Utc::now().timestamp())
    .execute(&mut *tx)
    .await?;

    touch(&mut tx, playlist_id).await?;
    tx.commit().await?;

    Ok(())
}

/// Remove a track from a playlist
///
/// Positions of remaining entries are left as-is; gaps are permitted.
pub async fn remove_track(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    track_id: TrackId,
    acting_user: UserId,
) -> Result<()> {
    require_editable(pool, playlist_id, acting_user).await?;

    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
        .bind(playlist_id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("Playlist track", track_id));
    }

    touch(&mut tx, playlist_id).await?;
    tx.commit().await?;

    Ok(())
}

/// Reorder playlist tracks
///
/// Each track id present in both the input and the playlist takes its index
/// in the input as its new position. Ids that are not members are silently
/// ignored; members absent from the input keep their old position, which can
/// collide with reassigned ones.
pub async fn reorder_tracks(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    order: &[TrackId],
    acting_user: UserId,
) -> Result<()> {
    require_editable(pool, playlist_id, acting_user).await?;

    let mut tx = pool.begin().await?;

    for (index, track_id) in order.iter().enumerate() {
        sqlx::query(
            "UPDATE playlist_tracks SET position = ? WHERE playlist_id = ? AND track_id = ?",
        )
        .bind(index as i64)
        .bind(playlist_id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?;
    }

    touch(&mut tx, playlist_id).await?;
    tx.commit().await?;

    Ok(())
}

async fn touch(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    playlist_id: PlaylistId,
) -> Result<()> {
    sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(chrono::Utc::now().timestamp())
        .bind(playlist_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
