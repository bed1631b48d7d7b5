//! Request authentication.
//!
//! Every schedule, staff, and template route takes an [`AuthUser`]
//! argument. The extractor runs before the handler body and rejects the
//! request with 401 when the bearer token is missing, malformed, lapsed,
//! or signed for a different deployment.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use rota_core::error::CoreError;
use rota_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, taken from the access token claims.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
}

/// The token part of an `Authorization: Bearer <token>` header, if the
/// header is present and uses the bearer scheme.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            unauthorized("Expected a bearer token in the Authorization header")
        })?;

        let claims = state
            .config
            .jwt
            .decode_access_token(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
        })
    }
}
