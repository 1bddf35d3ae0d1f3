//! Recipe Catalog Shared Library
//!
//! This crate contains the closed domain enums, request/response types and
//! validation rules shared by the backend and any client.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Measurement, RecipeColumn, Relation, SortField};
pub use types::*;
