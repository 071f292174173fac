/// Playlists API routes
use crate::{
    error::Result,
    middleware::{AuthenticatedUser, MaybeUser},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use mixtape_core::{
    Collaborator, CollaboratorRole, CreatePlaylist, MixtapeError, Playlist, PlaylistId, TrackId,
    UpdatePlaylist, UserId,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Comma-separated mood tag names
    pub mood: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    /// Playlists are public unless the creator opts out
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AddTrackRequest {
    pub track_id: Option<TrackId>,
    /// Import URL; used when no track_id is given
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub track_ids: Vec<TrackId>,
}

#[derive(Debug, Deserialize)]
pub struct AddCollaboratorRequest {
    pub username: String,
    /// Defaults to viewer when omitted
    #[serde(default)]
    pub role: CollaboratorRole,
}

#[derive(Debug, Deserialize)]
pub struct SetMoodsRequest {
    pub moods: Vec<String>,
}

/// GET /api/playlists
/// Public playlists, plus the viewer's own when authenticated. Optionally
/// filtered by mood tag names.
pub async fn list_playlists(
    State(app_state): State<AppState>,
    viewer: MaybeUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Playlist>>> {
    let mood_names: Option<Vec<String>> = params.mood.map(|m| {
        m.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    });

    let playlists =
        mixtape_storage::playlists::list_visible(&app_state.pool, viewer.0, mood_names.as_deref())
            .await?;
    Ok(Json(playlists))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<Json<Playlist>> {
    let playlist = mixtape_storage::playlists::create(
        &app_state.pool,
        CreatePlaylist {
            title: req.title,
            description: req.description,
            cover_url: req.cover_url,
            is_public: req.is_public,
            owner_id: auth.user_id(),
        },
    )
    .await?;
    Ok(Json(playlist))
}

/// GET /api/playlists/:id
/// Playlist details with ordered entries and mood tags. Private playlists
/// are visible only to the owner and collaborators.
pub async fn get_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    viewer: MaybeUser,
) -> Result<Json<Playlist>> {
    let playlist = mixtape_storage::playlists::get_with_tracks(&app_state.pool, id)
        .await?
        .ok_or_else(|| MixtapeError::not_found("Playlist", id))?;

    if !playlist.is_public && !can_view(&app_state, &playlist, viewer.0).await? {
        // Hide the existence of private playlists from outsiders
        return Err(MixtapeError::not_found("Playlist", id).into());
    }

    Ok(Json(playlist))
}

/// PUT /api/playlists/:id
pub async fn update_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<Json<Playlist>> {
    let playlist = mixtape_storage::playlists::update(
        &app_state.pool,
        id,
        UpdatePlaylist {
            title: req.title,
            description: req.description,
            cover_url: req.cover_url,
            is_public: req.is_public,
        },
        auth.user_id(),
    )
    .await?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    mixtape_storage::playlists::delete(&app_state.pool, id, auth.user_id()).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/playlists/:id/tracks
/// Add a track by id, or by import URL when no id is given.
pub async fn add_track_to_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<AddTrackRequest>,
) -> Result<Json<Playlist>> {
    let track_id = match (req.track_id, req.url) {
        (Some(track_id), _) => track_id,
        (None, Some(url)) => {
            // A denied add must not persist the imported track
            mixtape_storage::playlists::require_editable(&app_state.pool, id, auth.user_id())
                .await?;
            mixtape_storage::tracks::import_from_url(&app_state.pool, &url)
                .await?
                .id
        }
        (None, None) => {
            return Err(MixtapeError::validation("track_id or url is required").into());
        }
    };

    mixtape_storage::playlists::add_track(&app_state.pool, id, track_id, auth.user_id()).await?;

    let playlist = mixtape_storage::playlists::get_with_tracks(&app_state.pool, id)
        .await?
        .ok_or_else(|| MixtapeError::not_found("Playlist", id))?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id/tracks/:track_id
pub async fn remove_track_from_playlist(
    Path((id, track_id)): Path<(PlaylistId, TrackId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    mixtape_storage::playlists::remove_track(&app_state.pool, id, track_id, auth.user_id()).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// PATCH /api/playlists/:id/tracks/order
pub async fn reorder_playlist_tracks(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<Playlist>> {
    mixtape_storage::playlists::reorder_tracks(&app_state.pool, id, &req.track_ids, auth.user_id())
        .await?;

    let playlist = mixtape_storage::playlists::get_with_tracks(&app_state.pool, id)
        .await?
        .ok_or_else(|| MixtapeError::not_found("Playlist", id))?;
    Ok(Json(playlist))
}

/// GET /api/playlists/:id/collaborators
pub async fn list_collaborators(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Collaborator>>> {
    if mixtape_storage::playlists::get_by_id(&app_state.pool, id)
        .await?
        .is_none()
    {
        return Err(MixtapeError::not_found("Playlist", id).into());
    }

    let collaborators = mixtape_storage::collaborators::list(&app_state.pool, id).await?;
    Ok(Json(collaborators))
}

/// POST /api/playlists/:id/collaborators
pub async fn add_collaborator(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<AddCollaboratorRequest>,
) -> Result<Json<Collaborator>> {
    let collaborator = mixtape_storage::collaborators::add(
        &app_state.pool,
        id,
        &req.username,
        req.role,
        auth.user_id(),
    )
    .await?;
    Ok(Json(collaborator))
}

/// DELETE /api/playlists/:id/collaborators/:user_id
pub async fn remove_collaborator(
    Path((id, user_id)): Path<(PlaylistId, UserId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    mixtape_storage::collaborators::remove(&app_state.pool, id, user_id, auth.user_id()).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// PUT /api/playlists/:id/moods
pub async fn set_playlist_moods(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<SetMoodsRequest>,
) -> Result<Json<Vec<mixtape_core::MoodTag>>> {
    let moods =
        mixtape_storage::moods::set_for_playlist(&app_state.pool, id, &req.moods, auth.user_id())
            .await?;
    Ok(Json(moods))
}

async fn can_view(
    app_state: &AppState,
    playlist: &Playlist,
    viewer: Option<UserId>,
) -> Result<bool> {
    let Some(viewer) = viewer else {
        return Ok(false);
    };
    if playlist.owner_id == viewer {
        return Ok(true);
    }
    let grant = mixtape_storage::collaborators::get(&app_state.pool, playlist.id, viewer).await?;
    Ok(grant.is_some())
}
