//! Authentication handlers
//!
//! Endpoints for user registration and password login. Both end by issuing
//! a signed token for the principal.

use axum::{extract::State, Json};
use keygate_common::{AppError, Principal};
use tracing::{info, warn};

use crate::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new user
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let password_hash = state.password_service().hash(&request.password)?;

    let principal = Principal::new(request.username, password_hash);
    state.directory().insert(principal.clone()).await?;

    info!(username = %principal.username, "User registered");

    let response = issue_for(&state, &principal)?;
    Ok(Created(Json(response)))
}

/// Login with username and password
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    // Unknown user and wrong password are indistinguishable to the client
    let principal = state
        .directory()
        .find_by_username(&request.username)
        .await?
        .ok_or_else(|| {
            warn!(username = %request.username, "Login failed: user not found");
            AppError::InvalidCredentials
        })?;

    state
        .password_service()
        .verify_or_error(&request.password, &principal.password_hash)
        .map_err(|e| {
            if matches!(e, AppError::InvalidCredentials) {
                warn!(username = %principal.username, "Login failed: invalid password");
            }
            e
        })?;

    info!(username = %principal.username, "User logged in");

    let response = issue_for(&state, &principal)?;
    Ok(Json(response))
}

/// Issue a token for a principal and assemble the auth response
fn issue_for(state: &AppState, principal: &Principal) -> ApiResult<AuthResponse> {
    let token = state
        .token_service()
        .issue(&principal.username)
        .map_err(AppError::from)?;

    Ok(AuthResponse::new(
        token,
        state.config().auth.token_ttl_secs,
        UserResponse::from(principal),
    ))
}
