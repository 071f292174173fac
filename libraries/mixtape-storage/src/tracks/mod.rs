//! Track catalog queries and URL import

use crate::datetime_from_ts;
use mixtape_core::error::{MixtapeError, Result};
use mixtape_core::types::{CreateTrack, ImportSource, Track, TrackId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const TRACK_COLUMNS: &str =
    "id, title, artist, album, duration_sec, spotify_id, youtube_id, cover_url, created_at";

fn track_from_row(row: &SqliteRow) -> Result<Track> {
    Ok(Track {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        duration_sec: row.get("duration_sec"),
        spotify_id: row.get("spotify_id"),
        youtube_id: row.get("youtube_id"),
        cover_url: row.get("cover_url"),
        created_at: datetime_from_ts(row.get::<i64, _>("created_at"))?,
    })
}

/// Create a new track
pub async fn create(pool: &SqlitePool, track: CreateTrack) -> Result<Track> {
    if track.title.trim().is_empty() || track.artist.trim().is_empty() {
        return Err(MixtapeError::validation("title and artist are required"));
    }

    let result = sqlx::query(
        "INSERT INTO tracks (title, artist, album, duration_sec, spotify_id, youtube_id, cover_url, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(track.duration_sec)
    .bind(&track.spotify_id)
    .bind(&track.youtube_id)
    .bind(&track.cover_url)
    .bind(chrono::Utc::now().timestamp())
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::Database("Failed to retrieve created track".to_string()))
}

/// Get track by ID
pub async fn get_by_id(pool: &SqlitePool, id: TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(&format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(track_from_row).transpose()
}

/// Get all tracks, ordered by title
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query(&format!("SELECT {TRACK_COLUMNS} FROM tracks ORDER BY title"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(track_from_row).collect()
}

/// Search tracks by title or artist substring
pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<Track>> {
    let pattern = format!("%{query}%");

    let rows = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks
         WHERE title LIKE ? OR artist LIKE ?
         ORDER BY title"
    ))
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    rows.iter().map(track_from_row).collect()
}

/// Materialize a placeholder track from an import URL
///
/// Classifies the URL by domain substring and persists the synthesized
/// track; the raw URL is stored in the external-id column matching the
/// detected source (Spotify and YouTube only).
pub async fn import_from_url(pool: &SqlitePool, url: &str) -> Result<Track> {
    let url = url.trim();
    if url.is_empty() {
        return Err(MixtapeError::validation("url is required"));
    }

    let source = ImportSource::detect(url);
    create(pool, source.placeholder_track(url)).await
}
