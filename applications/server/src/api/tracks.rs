/// Tracks API routes: catalog, search, import, and likes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use mixtape_core::{CreateTrack, Like, LikeOutcome, Track, TrackId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTrackRequest {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration_sec: Option<i64>,
    pub cover_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImportTrackRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub outcome: LikeOutcome,
}

/// GET /api/tracks
/// Catalog listing; filters by title/artist substring when `q` is present.
pub async fn list_tracks(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Track>>> {
    let tracks = if params.q.trim().is_empty() {
        mixtape_storage::tracks::get_all(&app_state.pool).await?
    } else {
        mixtape_storage::tracks::search(&app_state.pool, &params.q).await?
    };
    Ok(Json(tracks))
}

/// GET /api/tracks/search?q=...
pub async fn search_tracks(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Track>>> {
    let tracks = mixtape_storage::tracks::search(&app_state.pool, &params.q).await?;
    Ok(Json(tracks))
}

/// GET /api/tracks/:id
pub async fn get_track(
    Path(id): Path<TrackId>,
    State(app_state): State<AppState>,
) -> Result<Json<Track>> {
    let track = mixtape_storage::tracks::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| mixtape_core::MixtapeError::not_found("Track", id))?;
    Ok(Json(track))
}

/// POST /api/tracks
pub async fn create_track(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Json(req): Json<CreateTrackRequest>,
) -> Result<Json<Track>> {
    let track = mixtape_storage::tracks::create(
        &app_state.pool,
        CreateTrack {
            title: req.title,
            artist: req.artist,
            album: req.album,
            duration_sec: req.duration_sec,
            cover_url: req.cover_url,
            ..CreateTrack::default()
        },
    )
    .await?;
    Ok(Json(track))
}

/// POST /api/tracks/import
/// Materialize a placeholder track from an external URL.
pub async fn import_track(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Json(req): Json<ImportTrackRequest>,
) -> Result<Json<Track>> {
    let track = mixtape_storage::tracks::import_from_url(&app_state.pool, &req.url).await?;
    Ok(Json(track))
}

/// POST /api/tracks/:id/like
pub async fn like_track(
    Path(id): Path<TrackId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<LikeResponse>> {
    let outcome = mixtape_storage::likes::like(&app_state.pool, auth.user_id(), id).await?;
    Ok(Json(LikeResponse { outcome }))
}

/// DELETE /api/tracks/:id/like
pub async fn unlike_track(
    Path(id): Path<TrackId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    mixtape_storage::likes::unlike(&app_state.pool, auth.user_id(), id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /api/me/likes
pub async fn my_likes(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Like>>> {
    let likes = mixtape_storage::likes::get_for_user(&app_state.pool, auth.user_id()).await?;
    Ok(Json(likes))
}
