//! Bearer-token extractor
//!
//! Resolves `Authorization: Bearer <jwt>` into the author id the recipe
//! writes run as.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::errors::ErrorKind;
use recipe_catalog_shared::AuthError;

/// Authenticated author extracted from the JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub author_id: i32,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized(AuthError::MissingToken.to_string()))?;

        let token = bearer_token(header)
            .ok_or_else(|| ApiError::Unauthorized(AuthError::InvalidToken.to_string()))?;

        let claims = app_state
            .jwt()
            .validate(token)
            .map_err(|e| ApiError::Unauthorized(rejection_reason(&e).to_string()))?;

        let author_id = claims
            .author_id()
            .map_err(|_| ApiError::Unauthorized(AuthError::InvalidToken.to_string()))?;

        Ok(AuthUser { author_id })
    }
}

fn rejection_reason(err: &anyhow::Error) -> AuthError {
    match err.downcast_ref::<jsonwebtoken::errors::Error>().map(|e| e.kind()) {
        Some(ErrorKind::ExpiredSignature) => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
