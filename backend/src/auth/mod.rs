//! Authentication and authorization
//!
//! JWT bearer tokens, argon2 password hashing and the recipe mutation policy.

mod jwt;
mod middleware;
mod password;
pub mod policy;

pub use jwt::{Claims, JwtService};
pub use middleware::AuthUser;
pub use password::PasswordService;
pub use policy::{MutationPolicy, OwnedResource, OwnerOnly, OwnerOrAdmin};
