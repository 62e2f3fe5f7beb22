//! User handlers

use axum::Json;

use crate::dto::UserResponse;
use crate::extractors::AuthPrincipal;
use crate::response::ApiResult;

/// Get the currently authenticated user
///
/// GET /api/v1/users/@me
pub async fn get_current_user(AuthPrincipal(principal): AuthPrincipal) -> ApiResult<Json<UserResponse>> {
    Ok(Json(UserResponse::from(&principal)))
}
