//! Read planning: filters, ordering, pagination and projection

pub mod filter;
pub mod pagination;
pub mod projection;

pub use filter::{plan, PlanError, Predicate, QueryPlan, RecipeFilter, SortDirection, SortOrder};
pub use pagination::PageRequest;
pub use projection::FetchPlan;
