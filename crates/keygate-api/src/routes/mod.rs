//! Route definitions
//!
//! Auth routes are open; everything else under /api/v1 sits behind the
//! bearer-token gate via the `AuthPrincipal` extractor.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, health, users};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new().merge(auth_routes()).merge(user_routes())
}

/// Authentication routes (no token required)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

/// User routes (token required)
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/@me", get(users::get_current_user))
}
