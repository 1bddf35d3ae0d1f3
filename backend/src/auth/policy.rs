//! Authorization of recipe mutations
//!
//! The write path asks a [`MutationPolicy`] whether the caller may touch an
//! existing recipe. Existence is settled before the policy is consulted.

use super::AuthUser;
use crate::config::AuthorizationConfig;
use std::collections::HashSet;
use std::sync::Arc;

/// Ownership facts of a stored recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedResource {
    pub id: i32,
    pub owner_id: i32,
}

/// Decides whether a principal may update or delete a resource
pub trait MutationPolicy: Send + Sync {
    fn can_mutate(&self, principal: &AuthUser, resource: &OwnedResource) -> bool;
}

/// Only the author of a recipe may mutate it
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOnly;

impl MutationPolicy for OwnerOnly {
    fn can_mutate(&self, principal: &AuthUser, resource: &OwnedResource) -> bool {
        principal.author_id == resource.owner_id
    }
}

/// The author, or any configured administrator
#[derive(Debug, Clone, Default)]
pub struct OwnerOrAdmin {
    admins: HashSet<i32>,
}

impl OwnerOrAdmin {
    pub fn new(admins: impl IntoIterator<Item = i32>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }
}

impl MutationPolicy for OwnerOrAdmin {
    fn can_mutate(&self, principal: &AuthUser, resource: &OwnedResource) -> bool {
        OwnerOnly.can_mutate(principal, resource) || self.admins.contains(&principal.author_id)
    }
}

/// Build the policy selected by configuration
pub fn policy_from_config(config: &AuthorizationConfig) -> Arc<dyn MutationPolicy> {
    if config.admin_author_ids.is_empty() {
        Arc::new(OwnerOnly)
    } else {
        Arc::new(OwnerOrAdmin::new(config.admin_author_ids.iter().copied()))
    }
}
