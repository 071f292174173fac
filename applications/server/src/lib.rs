//! Mixtape Server Library
//!
//! Multi-user playlist-sharing server with authentication, collaborative
//! playlists, mood tagging, and track likes.
//!
//! This library exposes the router and core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::AuthService;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
pub fn create_router(app_state: AppState) -> Router {
    let auth_service = Arc::clone(&app_state.auth);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/refresh", post(api::auth::refresh))
        .route("/tracks", get(api::tracks::list_tracks))
        .route("/tracks/search", get(api::tracks::search_tracks))
        .route("/tracks/:id", get(api::tracks::get_track))
        .route("/moods", get(api::moods::list_moods))
        .route("/playlists", get(api::playlists::list_playlists))
        .route("/playlists/:id", get(api::playlists::get_playlist))
        .route(
            "/playlists/:id/collaborators",
            get(api::playlists::list_collaborators),
        );

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Tracks
        .route("/tracks", post(api::tracks::create_track))
        .route("/tracks/import", post(api::tracks::import_track))
        .route("/tracks/:id/like", post(api::tracks::like_track))
        .route("/tracks/:id/like", delete(api::tracks::unlike_track))
        .route("/me/likes", get(api::tracks::my_likes))
        // Playlists
        .route("/playlists", post(api::playlists::create_playlist))
        .route("/playlists/:id", put(api::playlists::update_playlist))
        .route("/playlists/:id", delete(api::playlists::delete_playlist))
        .route(
            "/playlists/:id/tracks",
            post(api::playlists::add_track_to_playlist),
        )
        .route(
            "/playlists/:id/tracks/:track_id",
            delete(api::playlists::remove_track_from_playlist),
        )
        .route(
            "/playlists/:id/tracks/order",
            patch(api::playlists::reorder_playlist_tracks),
        )
        .route(
            "/playlists/:id/collaborators",
            post(api::playlists::add_collaborator),
        )
        .route(
            "/playlists/:id/collaborators/:user_id",
            delete(api::playlists::remove_collaborator),
        )
        .route("/playlists/:id/moods", put(api::playlists::set_playlist_moods))
        .layer(axum_middleware::from_fn_with_state(
            auth_service,
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
