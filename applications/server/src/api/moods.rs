/// Mood taxonomy API routes
use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};
use mixtape_core::MoodTag;

/// GET /api/moods
pub async fn list_moods(State(app_state): State<AppState>) -> Result<Json<Vec<MoodTag>>> {
    let moods = mixtape_storage::moods::get_all(&app_state.pool).await?;
    Ok(Json(moods))
}
