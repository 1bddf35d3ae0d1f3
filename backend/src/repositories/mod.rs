//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod author;
pub mod catalog;
pub mod recipe;

pub use author::{AuthorRecord, AuthorRepository, AuthorRow, CreateAuthor};
pub use catalog::{CatalogRepository, LookupRow, LookupTable};
pub use recipe::{
    RecipeAggregate, RecipeAllergenRow, RecipeIngredientRow, RecipeRepository, RecipeRow,
};
