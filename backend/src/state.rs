//! Application state management
//!
//! Shared resources handed to every request handler via Axum's state
//! extraction. Every field is cheap to clone.

use crate::auth::{policy, JwtService, MutationPolicy};
use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Who may update or delete recipes
    pub policy: Arc<dyn MutationPolicy>,
}

impl AppState {
    /// Create the application state. Derives JWT keys, so call once at startup.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);
        let policy = policy::policy_from_config(&config.authorization);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            policy,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn policy(&self) -> &dyn MutationPolicy {
        self.policy.as_ref()
    }
}
