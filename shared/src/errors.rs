//! Error types for the recipe catalog

use thiserror::Error;

/// Errors raised while decoding catalog values at the boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown measurement code: {0}")]
    InvalidMeasurement(i16),

    #[error("unknown measurement: {0}")]
    UnknownMeasurement(String),

    #[error("unknown relation: {0}")]
    UnknownRelation(String),
}

/// Authentication error types
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing token")]
    MissingToken,
}
