//! Business logic services
//!
//! Services validate input, coordinate repositories and own the transaction
//! boundary of every write.

pub mod author;
pub mod catalog;
pub mod recipe;

pub use author::AuthorService;
pub use catalog::CatalogService;
pub use recipe::RecipeService;
