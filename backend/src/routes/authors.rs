//! Author routes
//!
//! Registration, login and the profile of the authenticated author.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::AuthorService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use recipe_catalog_shared::types::{AuthorProfile, LoginRequest, RegisterRequest, TokenResponse};

/// Create author routes
pub fn author_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// POST /api/v1/authors/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let token = AuthorService::register(state.db(), state.jwt(), &req).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /api/v1/authors/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = AuthorService::login(state.db(), state.jwt(), &req).await?;
    Ok(Json(token))
}

/// GET /api/v1/authors/me
///
/// Requires a valid Bearer token.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<AuthorProfile>> {
    let profile = AuthorService::profile(state.db(), auth.author_id).await?;
    Ok(Json(profile))
}
