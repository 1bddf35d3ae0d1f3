//! Author service for registration and authentication
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::{JwtService, PasswordService};
use crate::db::{self, ConstraintViolation};
use crate::error::ApiError;
use crate::repositories::{AuthorRepository, CreateAuthor};
use recipe_catalog_shared::types::{AuthorProfile, LoginRequest, RegisterRequest, TokenResponse};
use recipe_catalog_shared::AuthError;
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

/// Author service
pub struct AuthorService;

impl AuthorService {
    /// Register a new author and issue a token for it
    pub async fn register(
        pool: &PgPool,
        jwt: &JwtService,
        input: &RegisterRequest,
    ) -> Result<TokenResponse, ApiError> {
        input.validate()?;

        if AuthorRepository::login_exists(pool, &input.login)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(login_taken());
        }

        let password_hash = PasswordService::hash_async(input.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        let author = AuthorRepository::create(
            pool,
            CreateAuthor {
                first_name: input.first_name.trim(),
                last_name: input.last_name.trim(),
                login: &input.login,
                password_hash: &password_hash,
            },
        )
        .await
        .map_err(|e| match db::constraint_violation(&e) {
            // Lost a race with a concurrent registration
            Some(ConstraintViolation::Unique) => login_taken(),
            _ => ApiError::Internal(e),
        })?;

        info!(author_id = author.id, "Author registered");
        Self::token_for(jwt, author.id)
    }

    /// Exchange a login and password for a token
    pub async fn login(
        pool: &PgPool,
        jwt: &JwtService,
        input: &LoginRequest,
    ) -> Result<TokenResponse, ApiError> {
        let author = AuthorRepository::find_by_login(pool, &input.login)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(invalid_credentials)?;

        let valid = PasswordService::verify_async(input.password.clone(), author.password_hash)
            .await
            .map_err(ApiError::Internal)?;
        if !valid {
            return Err(invalid_credentials());
        }

        Self::token_for(jwt, author.id)
    }

    /// Profile of the authenticated author
    pub async fn profile(pool: &PgPool, author_id: i32) -> Result<AuthorProfile, ApiError> {
        let author = AuthorRepository::find_by_id(pool, author_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("author with this id not found".to_string()))?;

        Ok(AuthorProfile {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            login: author.login,
        })
    }

    fn token_for(jwt: &JwtService, author_id: i32) -> Result<TokenResponse, ApiError> {
        let token = jwt.issue(author_id).map_err(ApiError::Internal)?;
        Ok(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: jwt.expiry_secs(),
        })
    }
}

fn login_taken() -> ApiError {
    ApiError::Conflict("login already registered".to_string())
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized(AuthError::InvalidCredentials.to_string())
}
