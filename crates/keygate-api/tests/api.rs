//! End-to-end API tests
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot`;
//! no live server or external services required.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use keygate_api::{create_app, AppState};
use keygate_common::{
    AppConfig, AppSettings, AuthConfig, CorsConfig, Environment, MemoryDirectory, ServerConfig,
    TokenService,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret-key-0123456789abcdef";

fn test_config(token_ttl_secs: i64) -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "keygate".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        auth: AuthConfig {
            secret: SECRET.to_string(),
            token_ttl_secs,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
    }
}

fn test_app() -> Router {
    test_app_with_ttl(3600)
}

fn test_app_with_ttl(token_ttl_secs: i64) -> Router {
    let state = AppState::new(
        Arc::new(MemoryDirectory::new()),
        TokenService::new(SECRET, token_ttl_secs),
        test_config(token_ttl_secs),
    );
    create_app(state)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

async fn get(app: &Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).unwrap();

    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn register(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    post_json(
        app,
        "/api/v1/auth/register",
        json!({ "username": username, "password": password }),
    )
    .await
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn health_check_is_open() {
    let app = test_app();

    let (status, body) = get(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_returns_token_and_user() {
    let app = test_app();

    let (status, body) = register(&app, "alice", "correct horse battery").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    assert_eq!(body["user"]["username"], "alice");
    let token = body["access_token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app();

    register(&app, "alice", "correct horse battery").await;
    let (status, body) = register(&app, "alice", "another password").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "ALREADY_EXISTS");
}

#[tokio::test]
async fn register_validates_input() {
    let app = test_app();

    let (status, body) = register(&app, "alice", "short").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn login_then_me_round_trip() {
    let app = test_app();
    register(&app, "alice", "correct horse battery").await;

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "alice", "password": "correct horse battery" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = get(&app, "/api/v1/users/@me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn login_wrong_password_and_unknown_user_look_identical() {
    let app = test_app();
    register(&app, "alice", "correct horse battery").await;

    let (wrong_status, wrong_body) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "alice", "password": "bad password" }),
    )
    .await;
    let (unknown_status, unknown_body) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "mallory", "password": "bad password" }),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    // No user-existence oracle
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn protected_route_without_token_is_rejected() {
    let app = test_app();

    let (status, body) = get(&app, "/api/v1/users/@me", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTHENTICATION_REQUIRED");
}

#[tokio::test]
async fn rejection_reason_is_not_leaked() {
    let app = test_app();
    let (_, body) = register(&app, "alice", "correct horse battery").await;
    let token = body["access_token"].as_str().unwrap().to_string();

    // Malformed, tampered, wrong-key and expired credentials must all
    // produce the same generic response
    let mut tampered = token.clone();
    tampered.pop();
    tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

    let foreign = TokenService::new("a-completely-different-secret-material", 3600)
        .issue("alice")
        .unwrap();

    let expired = TokenService::new(SECRET, -10).issue("alice").unwrap();

    let mut bodies = Vec::new();
    for bad_token in ["garbage", tampered.as_str(), foreign.as_str(), expired.as_str()] {
        let (status, body) = get(&app, "/api/v1/users/@me", Some(bad_token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        bodies.push(body);
    }
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn valid_token_for_absent_principal_is_rejected() {
    let app = test_app();

    // Correctly signed, unexpired, but the subject was never registered
    let token = TokenService::new(SECRET, 3600).issue("ghost").unwrap();

    let (status, body) = get(&app, "/api/v1/users/@me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTHENTICATION_REQUIRED");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = test_app_with_ttl(-10);
    let (_, body) = register(&app, "alice", "correct horse battery").await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = get(&app, "/api/v1/users/@me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTHENTICATION_REQUIRED");
}
