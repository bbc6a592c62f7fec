use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        extractors::AuthUser,
        repo_types::{UpsertUser, User},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/auth/user", get(get_current_user))
}

/// Syncs the caller's profile from the verified provider token.
#[instrument(skip(state, user), fields(user_id = %user.id()))]
pub async fn login(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<User>, AppError> {
    sync_user(&state, &user).await.map(Json)
}

/// Current user, created or refreshed from the token on every call.
#[instrument(skip(state, user), fields(user_id = %user.id()))]
pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<User>, AppError> {
    sync_user(&state, &user).await.map(Json)
}

async fn sync_user(state: &AppState, user: &AuthUser) -> Result<User, AppError> {
    let record = state.store.upsert_user(UpsertUser::from(&user.0)).await?;
    info!(email = ?record.email, "user synced");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{
        ai::{Summarizer, SummarizerError, SummaryMode},
        app::build_app,
        auth::keys::test_support::token_for,
        store::{memory::MemoryStore, Store},
    };

    struct NoopSummarizer;

    #[async_trait::async_trait]
    impl Summarizer for NoopSummarizer {
        async fn summarize(&self, _t: &str, _m: SummaryMode) -> Result<String, SummarizerError> {
            Err(SummarizerError::Unavailable)
        }
    }

    fn app() -> axum::Router {
        let state = crate::state::AppState::fake(
            Arc::new(MemoryStore::default()) as Arc<dyn Store>,
            Arc::new(NoopSummarizer) as Arc<dyn Summarizer>,
        );
        build_app(state)
    }

    async fn call(app: &axum::Router, method: Method, uri: &str, user: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for(user)))
            .body(Body::empty())
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn current_user_is_created_from_a_fresh_token() {
        let app = app();
        let (status, json) = call(&app, Method::GET, "/api/auth/user", "alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "alice");
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["firstName"], "Min");
        assert!(json["createdAt"].is_string());
    }

    #[tokio::test]
    async fn login_and_current_user_return_the_same_record() {
        let app = app();
        let (status, login) = call(&app, Method::POST, "/api/login", "alice").await;
        assert_eq!(status, StatusCode::OK);
        let (status, me) = call(&app, Method::GET, "/api/auth/user", "alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["id"], login["id"]);
        assert_eq!(me["createdAt"], login["createdAt"]);
    }

    #[tokio::test]
    async fn repeated_login_is_idempotent() {
        let app = app();
        let (_, first) = call(&app, Method::POST, "/api/login", "alice").await;
        let (status, second) = call(&app, Method::POST, "/api/login", "alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["createdAt"], second["createdAt"]);
        assert_eq!(first["id"], second["id"]);
    }

    #[tokio::test]
    async fn malformed_bearer_is_401() {
        let app = app();
        let req = Request::builder()
            .uri("/api/auth/user")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
