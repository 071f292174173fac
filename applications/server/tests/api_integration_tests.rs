/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::http::StatusCode;
use common::{create_test_app, json_body};

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;

    let response = app.get("/api/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let app = create_test_app().await;

    let response = app
        .post(
            "/api/auth/register",
            None,
            serde_json::json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert_eq!(body["user"]["username"], "alice");

    // Login with the same credentials
    let response = app
        .post(
            "/api/auth/login",
            None,
            serde_json::json!({ "username": "alice", "password": "password123" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    // Use the token on a protected route
    let response = app.get("/api/me/likes", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = create_test_app().await;

    let body = serde_json::json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "password123"
    });

    let response = app.post("/api/auth/register", None, body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.post("/api/auth/register", None, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app().await;
    app.user_with_token("alice").await;

    let response = app
        .post(
            "/api/auth/login",
            None,
            serde_json::json!({ "username": "alice", "password": "wrongpassword" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let app = create_test_app().await;

    let response = app
        .post(
            "/api/auth/register",
            None,
            serde_json::json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123"
            }),
        )
        .await;
    let body = json_body(response).await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .post(
            "/api/auth/refresh",
            None,
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["access_token"].is_string());
}

#[tokio::test]
async fn test_protected_route_requires_auth() {
    let app = create_test_app().await;

    let response = app
        .post("/api/playlists", None, serde_json::json!({ "title": "Mix" }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_playlist_crud() {
    let app = create_test_app().await;
    let (_user, token) = app.user_with_token("alice").await;

    // Create
    let response = app
        .post(
            "/api/playlists",
            Some(&token),
            serde_json::json!({ "title": "Road Trip", "is_public": true }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let playlist = json_body(response).await;
    let id = playlist["id"].as_i64().unwrap();
    assert_eq!(playlist["likes_count"], 0);

    // Update
    let response = app
        .put(
            &format!("/api/playlists/{id}"),
            Some(&token),
            serde_json::json!({ "description": "summer songs" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    assert_eq!(updated["title"], "Road Trip");
    assert_eq!(updated["description"], "summer songs");

    // Get with tracks
    let response = app.get(&format!("/api/playlists/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = json_body(response).await;
    assert_eq!(fetched["tracks"].as_array().unwrap().len(), 0);

    // Delete
    let response = app
        .delete(&format!("/api/playlists/{id}"), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get(&format!("/api/playlists/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_private_playlist_hidden_from_outsiders() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.user_with_token("alice").await;
    let (_bob, bob_token) = app.user_with_token("bob").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&alice_token),
            serde_json::json!({ "title": "Secret", "is_public": false }),
        )
        .await;
    let id = json_body(response).await["id"].as_i64().unwrap();

    // Anonymous and unrelated users get 404, the owner sees it
    let response = app.get(&format!("/api/playlists/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .get(&format!("/api/playlists/{id}"), Some(&bob_token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .get(&format!("/api/playlists/{id}"), Some(&alice_token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_add_remove_and_reorder_tracks() {
    let app = create_test_app().await;
    let (_user, token) = app.user_with_token("alice").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&token),
            serde_json::json!({ "title": "Mix", "is_public": true }),
        )
        .await;
    let playlist_id = json_body(response).await["id"].as_i64().unwrap();

    // Create two tracks and add both
    let mut track_ids = Vec::new();
    for (title, artist) in [("Song A", "Artist A"), ("Song B", "Artist B")] {
        let response = app
            .post(
                "/api/tracks",
                Some(&token),
                serde_json::json!({ "title": title, "artist": artist }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        track_ids.push(json_body(response).await["id"].as_i64().unwrap());
    }

    for track_id in &track_ids {
        let response = app
            .post(
                &format!("/api/playlists/{playlist_id}/tracks"),
                Some(&token),
                serde_json::json!({ "track_id": track_id }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Duplicate add is a conflict
    let response = app
        .post(
            &format!("/api/playlists/{playlist_id}/tracks"),
            Some(&token),
            serde_json::json!({ "track_id": track_ids[0] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Reverse the order
    let response = app
        .patch(
            &format!("/api/playlists/{playlist_id}/tracks/order"),
            Some(&token),
            serde_json::json!({ "track_ids": [track_ids[1], track_ids[0]] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let playlist = json_body(response).await;
    let entries = playlist["tracks"].as_array().unwrap();
    assert_eq!(entries[0]["track_id"].as_i64().unwrap(), track_ids[1]);
    assert_eq!(entries[1]["track_id"].as_i64().unwrap(), track_ids[0]);

    // Remove one
    let response = app
        .delete(
            &format!("/api/playlists/{playlist_id}/tracks/{}", track_ids[1]),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get(&format!("/api/playlists/{playlist_id}"), None).await;
    let playlist = json_body(response).await;
    assert_eq!(playlist["tracks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_track_by_url() {
    let app = create_test_app().await;
    let (_user, token) = app.user_with_token("alice").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&token),
            serde_json::json!({ "title": "Imports", "is_public": true }),
        )
        .await;
    let playlist_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            &format!("/api/playlists/{playlist_id}/tracks"),
            Some(&token),
            serde_json::json!({ "url": "https://open.spotify.com/track/abc123" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let playlist = json_body(response).await;
    let entries = playlist["tracks"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["title"], "Imported track from spotify");
}

#[tokio::test]
async fn test_add_track_without_id_or_url_rejected() {
    let app = create_test_app().await;
    let (_user, token) = app.user_with_token("alice").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&token),
            serde_json::json!({ "title": "Mix" }),
        )
        .await;
    let playlist_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            &format!("/api/playlists/{playlist_id}/tracks"),
            Some(&token),
            serde_json::json!({}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_collaborator_cannot_edit() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.user_with_token("alice").await;
    let (_bob, bob_token) = app.user_with_token("bob").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&alice_token),
            serde_json::json!({ "title": "Mix", "is_public": true }),
        )
        .await;
    let playlist_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            "/api/tracks",
            Some(&bob_token),
            serde_json::json!({ "title": "Song", "artist": "Artist" }),
        )
        .await;
    let track_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            &format!("/api/playlists/{playlist_id}/tracks"),
            Some(&bob_token),
            serde_json::json!({ "track_id": track_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_editor_collaborator_can_add_tracks() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.user_with_token("alice").await;
    let (_bob, bob_token) = app.user_with_token("bob").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&alice_token),
            serde_json::json!({ "title": "Shared", "is_public": true }),
        )
        .await;
    let playlist_id = json_body(response).await["id"].as_i64().unwrap();

    // Grant bob the editor role
    let response = app
        .post(
            &format!("/api/playlists/{playlist_id}/collaborators"),
            Some(&alice_token),
            serde_json::json!({ "username": "bob", "role": "editor" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let grant = json_body(response).await;
    assert_eq!(grant["role"], "editor");

    let response = app
        .post(
            "/api/tracks",
            Some(&bob_token),
            serde_json::json!({ "title": "Song", "artist": "Artist" }),
        )
        .await;
    let track_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            &format!("/api/playlists/{playlist_id}/tracks"),
            Some(&bob_token),
            serde_json::json!({ "track_id": track_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // An editor still cannot edit metadata
    let response = app
        .put(
            &format!("/api/playlists/{playlist_id}"),
            Some(&bob_token),
            serde_json::json!({ "title": "Hijacked" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_collaborator_role_defaults_to_viewer() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.user_with_token("alice").await;
    let (_bob, bob_token) = app.user_with_token("bob").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&alice_token),
            serde_json::json!({ "title": "Mix", "is_public": true }),
        )
        .await;
    let playlist_id = json_body(response).await["id"].as_i64().unwrap();

    // No role in the body: the grant lands as a viewer
    let response = app
        .post(
            &format!("/api/playlists/{playlist_id}/collaborators"),
            Some(&alice_token),
            serde_json::json!({ "username": "bob" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let grant = json_body(response).await;
    assert_eq!(grant["role"], "viewer");

    // A viewer grant carries no edit rights
    let response = app
        .post(
            "/api/tracks",
            Some(&bob_token),
            serde_json::json!({ "title": "Song", "artist": "Artist" }),
        )
        .await;
    let track_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            &format!("/api/playlists/{playlist_id}/tracks"),
            Some(&bob_token),
            serde_json::json!({ "track_id": track_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_denied_url_add_persists_no_track() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.user_with_token("alice").await;
    let (_bob, bob_token) = app.user_with_token("bob").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&alice_token),
            serde_json::json!({ "title": "Mix", "is_public": true }),
        )
        .await;
    let playlist_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            &format!("/api/playlists/{playlist_id}/tracks"),
            Some(&bob_token),
            serde_json::json!({ "url": "https://open.spotify.com/track/abc" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The rejected import must not leave a synthesized track behind
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_playlist_public_by_default() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.user_with_token("alice").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&alice_token),
            serde_json::json!({ "title": "Mix" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let playlist = json_body(response).await;
    assert_eq!(playlist["is_public"], true);

    // Visible to anonymous viewers
    let response = app.get("/api/playlists", None).await;
    let listing = json_body(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_only_owner_manages_collaborators() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.user_with_token("alice").await;
    let (_bob, bob_token) = app.user_with_token("bob").await;
    app.user_with_token("carol").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&alice_token),
            serde_json::json!({ "title": "Mix", "is_public": true }),
        )
        .await;
    let playlist_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            &format!("/api/playlists/{playlist_id}/collaborators"),
            Some(&bob_token),
            serde_json::json!({ "username": "carol", "role": "viewer" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_like_updates_playlist_counts() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.user_with_token("alice").await;
    let (_bob, bob_token) = app.user_with_token("bob").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&alice_token),
            serde_json::json!({ "title": "Mix", "is_public": true }),
        )
        .await;
    let playlist_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            "/api/tracks",
            Some(&alice_token),
            serde_json::json!({ "title": "Song", "artist": "Artist" }),
        )
        .await;
    let track_id = json_body(response).await["id"].as_i64().unwrap();

    app.post(
        &format!("/api/playlists/{playlist_id}/tracks"),
        Some(&alice_token),
        serde_json::json!({ "track_id": track_id }),
    )
    .await;

    // Bob likes the track; the containing playlist's count bumps
    let response = app
        .post(
            &format!("/api/tracks/{track_id}/like"),
            Some(&bob_token),
            serde_json::json!({}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["outcome"], "liked");

    let response = app.get(&format!("/api/playlists/{playlist_id}"), None).await;
    assert_eq!(json_body(response).await["likes_count"], 1);

    // Second like is a no-op
    let response = app
        .post(
            &format!("/api/tracks/{track_id}/like"),
            Some(&bob_token),
            serde_json::json!({}),
        )
        .await;
    assert_eq!(json_body(response).await["outcome"], "already");

    let response = app.get(&format!("/api/playlists/{playlist_id}"), None).await;
    assert_eq!(json_body(response).await["likes_count"], 1);

    // The like shows in bob's list
    let response = app.get("/api/me/likes", Some(&bob_token)).await;
    let likes = json_body(response).await;
    assert_eq!(likes.as_array().unwrap().len(), 1);

    // Unlike reverses the count
    let response = app
        .delete(&format!("/api/tracks/{track_id}/like"), Some(&bob_token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get(&format!("/api/playlists/{playlist_id}"), None).await;
    assert_eq!(json_body(response).await["likes_count"], 0);
}

#[tokio::test]
async fn test_unlike_without_like_not_found() {
    let app = create_test_app().await;
    let (_user, token) = app.user_with_token("alice").await;

    let response = app
        .post(
            "/api/tracks",
            Some(&token),
            serde_json::json!({ "title": "Song", "artist": "Artist" }),
        )
        .await;
    let track_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .delete(&format!("/api/tracks/{track_id}/like"), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_import_track_classifies_source() {
    let app = create_test_app().await;
    let (_user, token) = app.user_with_token("alice").await;

    let response = app
        .post(
            "/api/tracks/import",
            Some(&token),
            serde_json::json!({ "url": "https://youtu.be/dQw4w9WgXcQ" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let track = json_body(response).await;
    assert_eq!(track["title"], "Imported track from youtube");
    assert_eq!(track["youtube_id"], "https://youtu.be/dQw4w9WgXcQ");
    assert!(track["spotify_id"].is_null());
}

#[tokio::test]
async fn test_playlist_listing_visibility_and_mood_filter() {
    let app = create_test_app().await;
    let (_alice, alice_token) = app.user_with_token("alice").await;

    let response = app
        .post(
            "/api/playlists",
            Some(&alice_token),
            serde_json::json!({ "title": "Public Chill", "is_public": true }),
        )
        .await;
    let chill_id = json_body(response).await["id"].as_i64().unwrap();

    app.post(
        "/api/playlists",
        Some(&alice_token),
        serde_json::json!({ "title": "Private", "is_public": false }),
    )
    .await;

    // Tag the public one
    let response = app
        .put(
            &format!("/api/playlists/{chill_id}/moods"),
            Some(&alice_token),
            serde_json::json!({ "moods": ["chill", "focus"] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Anonymous listing only shows the public playlist
    let response = app.get("/api/playlists", None).await;
    let listing = json_body(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    // The owner sees both
    let response = app.get("/api/playlists", Some(&alice_token)).await;
    let listing = json_body(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 2);

    // Mood filter narrows the listing
    let response = app.get("/api/playlists?mood=chill", Some(&alice_token)).await;
    let listing = json_body(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["title"], "Public Chill");

    let response = app.get("/api/playlists?mood=metal", None).await;
    let listing = json_body(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 0);

    // The taxonomy endpoint lists created tags
    let response = app.get("/api/moods", None).await;
    let moods = json_body(response).await;
    assert_eq!(moods.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_track_search() {
    let app = create_test_app().await;
    let (_user, token) = app.user_with_token("alice").await;

    for (title, artist) in [("Bohemian Rhapsody", "Queen"), ("Yesterday", "Beatles")] {
        app.post(
            "/api/tracks",
            Some(&token),
            serde_json::json!({ "title": title, "artist": artist }),
        )
        .await;
    }

    let response = app.get("/api/tracks/search?q=queen", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let results = json_body(response).await;
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["title"], "Bohemian Rhapsody");

    let response = app.get("/api/tracks", None).await;
    let results = json_body(response).await;
    assert_eq!(results.as_array().unwrap().len(), 2);
}
