//! Request and response DTOs
//!
//! Requests implement `Deserialize` and `Validate`; responses implement
//! `Serialize`.

use chrono::{DateTime, Utc};
use keygate_common::Principal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,

    pub password: String,
}

/// Authentication response with the issued token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(access_token: String, expires_in: i64, user: UserResponse) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// Public view of a principal
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Principal> for UserResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id,
            username: principal.username.clone(),
            created_at: principal.created_at,
        }
    }
}

/// Liveness probe response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    #[must_use]
    pub fn healthy() -> Self {
        Self { status: "ok" }
    }
}
