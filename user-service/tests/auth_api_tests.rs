//! HTTP-level tests for registration and login
//!
//! The router runs against an in-memory credential store, so no database is
//! needed.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use configmanager_common::auth::{PasswordHasher, TokenService};
use configmanager_common::store::{CredentialStore, InMemoryCredentialStore};
use user_service::auth::AuthService;
use user_service::{build_router, AppState};

const SECRET: &str = "user-service-api-test-secret-0123456789";

fn setup() -> (Router, Arc<TokenService>, InMemoryCredentialStore) {
    let store = InMemoryCredentialStore::new();
    let tokens = Arc::new(TokenService::new(SECRET, 3600).unwrap());
    let hasher = PasswordHasher::new(4).unwrap();

    let credentials: Arc<dyn CredentialStore> = Arc::new(store.clone());
    let auth_service = Arc::new(AuthService::new(credentials, hasher, tokens.clone()));

    (build_router(AppState::new(auth_service), None), tokens, store)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_register_returns_token() {
    let (app, tokens, store) = setup();

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        json!({"username": "alice", "password": "p@ss1234", "email": "alice@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 3600);
    assert_eq!(body["username"], "alice");

    let token = body["token"].as_str().unwrap();
    assert_eq!(tokens.extract_subject(token).unwrap(), "alice");
    assert!(store.exists_by_username("alice").await.unwrap());
}

#[tokio::test]
async fn test_register_duplicate_conflicts() {
    let (app, _, store) = setup();
    let request = json!({"username": "alice", "password": "p@ss1234"});

    let (status, _) = post_json(&app, "/api/auth/register", request.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&app, "/api/auth/register", request).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_register_validates_body() {
    let (app, _, store) = setup();

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        json!({"username": "al", "password": "short"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_register_then_login() {
    let (app, tokens, _) = setup();
    let credentials = json!({"username": "alice", "password": "p@ss1234"});

    let (_, registered) = post_json(&app, "/api/auth/register", credentials.clone()).await;
    let (status, logged_in) = post_json(&app, "/api/auth/login", credentials).await;

    assert_eq!(status, StatusCode::OK);
    let first = registered["token"].as_str().unwrap();
    let second = logged_in["token"].as_str().unwrap();
    assert_ne!(first, second);
    assert!(tokens.verify(first, "alice"));
    assert!(tokens.verify(second, "alice"));
}

#[tokio::test]
async fn test_login_failures_look_identical() {
    let (app, _, _) = setup();
    post_json(
        &app,
        "/api/auth/register",
        json!({"username": "alice", "password": "p@ss1234"}),
    )
    .await;

    let (wrong_status, wrong_body) = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "wrong"}),
    )
    .await;
    let (unknown_status, unknown_body) = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "nobody", "password": "p@ss1234"}),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_security_headers_on_responses() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_register_missing_field_uses_error_envelope() {
    let (app, _, store) = setup();

    let (status, body) = post_json(&app, "/api/auth/register", json!({"username": "alice"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_login_missing_field_fails_like_wrong_password() {
    let (app, _, _) = setup();
    post_json(
        &app,
        "/api/auth/register",
        json!({"username": "alice", "password": "p@ss1234"}),
    )
    .await;

    let (status, body) = post_json(&app, "/api/auth/login", json!({"username": "alice"})).await;
    let (_, wrong_body) = post_json(
        &app,
        "/api/auth/login",
        json!({"username": "alice", "password": "wrong"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, wrong_body);
}
