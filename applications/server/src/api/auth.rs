/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, Json};
use mixtape_core::{CreateUser, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>> {
    if req.password.len() < 6 {
        return Err(ServerError::BadRequest(
            "password must be at least 6 characters".to_string(),
        ));
    }

    let password_hash = app_state.auth.hash_password(&req.password)?;
    let user = mixtape_storage::users::create_with_password(
        &app_state.pool,
        CreateUser {
            username: req.username,
            email: req.email,
        },
        &password_hash,
    )
    .await?;

    let access_token = app_state.auth.create_access_token(user.id)?;
    let refresh_token = app_state.auth.create_refresh_token(user.id)?;

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = mixtape_storage::users::find_by_username(&app_state.pool, &req.username)
        .await?
        .ok_or_else(|| ServerError::Auth("Invalid username or password".to_string()))?;

    let password_hash = mixtape_storage::users::get_password_hash(&app_state.pool, user.id)
        .await?
        .ok_or_else(|| ServerError::Auth("Invalid username or password".to_string()))?;

    if !app_state.auth.verify_password(&req.password, &password_hash)? {
        return Err(ServerError::Auth(
            "Invalid username or password".to_string(),
        ));
    }

    let access_token = app_state.auth.create_access_token(user.id)?;
    let refresh_token = app_state.auth.create_refresh_token(user.id)?;

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let user_id = app_state.auth.verify_refresh_token(&req.refresh_token)?;

    let access_token = app_state.auth.create_access_token(user_id)?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}
