//! Authentication extractor
//!
//! The request gate: extracts the bearer credential from the Authorization
//! header, validates it against the token service, and resolves the subject
//! through the principal directory. Handlers taking [`AuthPrincipal`] only
//! run for authenticated requests.
//!
//! Every failure — missing header, malformed token, bad signature, expiry,
//! unknown subject — is rejected with the same generic response; the
//! concrete reason is only logged.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use keygate_common::Principal;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated principal resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        let app_state = AppState::from_ref(state);
        let tokens = app_state.token_service();

        // Read the subject, then run full validation against it
        let subject = tokens.extract_subject(bearer.token()).map_err(|e| {
            tracing::warn!(error = %e, "Bearer token rejected");
            ApiError::Unauthorized
        })?;

        if !tokens.is_valid(bearer.token(), &subject) {
            tracing::warn!(subject = %subject, "Bearer token failed validation");
            return Err(ApiError::Unauthorized);
        }

        // Token checks out; resolving the principal is the gate's job
        let principal = app_state
            .directory()
            .find_by_username(&subject)
            .await?
            .ok_or_else(|| {
                tracing::warn!(subject = %subject, "Token subject not found in directory");
                ApiError::Unauthorized
            })?;

        Ok(AuthPrincipal(principal))
    }
}
