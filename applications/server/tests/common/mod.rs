/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use mixtape_core::{CreateUser, User};
use mixtape_server::{create_router, services::AuthService, state::AppState};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub auth: Arc<AuthService>,
    // Kept alive so the database file is not removed under us
    _dir: TempDir,
}

/// Create a test app with a real tempfile-backed database
pub async fn create_test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}", db_path.display());

    let pool = mixtape_storage::create_pool(&url).await.unwrap();
    mixtape_storage::run_migrations(&pool).await.unwrap();

    let auth = Arc::new(AuthService::new("test-secret-key".to_string(), 1, 1));
    let router = create_router(AppState::new(pool.clone(), Arc::clone(&auth)));

    TestApp {
        router,
        pool,
        auth,
        _dir: dir,
    }
}

impl TestApp {
    /// Register a user directly through storage and mint an access token
    pub async fn user_with_token(&self, username: &str) -> (User, String) {
        let hash = self.auth.hash_password("password123").unwrap();
        let user = mixtape_storage::users::create_with_password(
            &self.pool,
            CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
            },
            &hash,
        )
        .await
        .unwrap();

        let token = self.auth.create_access_token(user.id).unwrap();
        (user, token)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn patch(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.request("PATCH", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.request("DELETE", uri, token, None).await
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Read a response body as JSON
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    use http_body_util::BodyExt;

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
