//! Route definitions for the Recipe Catalog API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod authors;
mod catalog;
mod health;
mod recipes;

#[cfg(test)]
mod router_tests;

pub use authors::author_routes;
pub use catalog::{lookup_routes, Allergens, Cuisines, Ingredients, Lookup};
pub use recipes::recipe_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Recipe Catalog API v1" }))
        .nest("/authors", authors::author_routes())
        .nest("/recipes", recipes::recipe_routes())
        .nest("/cuisines", catalog::lookup_routes::<Cuisines>())
        .nest("/allergens", catalog::lookup_routes::<Allergens>())
        .nest(
            "/ingredients",
            catalog::lookup_routes::<Ingredients>()
                .route("/:id/recipes", get(recipes::list_by_ingredient)),
        )
}
