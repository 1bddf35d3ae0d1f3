//! Cuisine, allergen and ingredient routes
//!
//! The three tables expose the same CRUD surface; the handlers are generic
//! over a marker type naming the table.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::repositories::LookupTable;
use crate::services::CatalogService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use recipe_catalog_shared::types::{CatalogItem, CatalogItemWrite};
use tracing::debug;

/// Marker for one lookup table
pub trait Lookup: Send + Sync + 'static {
    const TABLE: LookupTable;
}

pub struct Cuisines;
pub struct Allergens;
pub struct Ingredients;

impl Lookup for Cuisines {
    const TABLE: LookupTable = LookupTable::Cuisines;
}

impl Lookup for Allergens {
    const TABLE: LookupTable = LookupTable::Allergens;
}

impl Lookup for Ingredients {
    const TABLE: LookupTable = LookupTable::Ingredients;
}

/// Create CRUD routes for one lookup table; writes require authentication
pub fn lookup_routes<L: Lookup>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<L>).post(create::<L>))
        .route("/:id", get(fetch::<L>).put(rename::<L>).delete(remove::<L>))
}

async fn list<L: Lookup>(State(state): State<AppState>) -> ApiResult<Json<Vec<CatalogItem>>> {
    let items = CatalogService::list(state.db(), L::TABLE).await?;
    Ok(Json(items))
}

async fn fetch<L: Lookup>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<CatalogItem>> {
    let item = CatalogService::get(state.db(), L::TABLE, id).await?;
    Ok(Json(item))
}

async fn create<L: Lookup>(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CatalogItemWrite>,
) -> ApiResult<(StatusCode, Json<CatalogItem>)> {
    debug!(table = L::TABLE.table(), author_id = auth.author_id, "Creating lookup row");
    let item = CatalogService::create(state.db(), L::TABLE, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn rename<L: Lookup>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<CatalogItemWrite>,
) -> ApiResult<Json<CatalogItem>> {
    debug!(table = L::TABLE.table(), id, author_id = auth.author_id, "Renaming lookup row");
    let item = CatalogService::rename(state.db(), L::TABLE, id, &input).await?;
    Ok(Json(item))
}

async fn remove<L: Lookup>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    debug!(table = L::TABLE.table(), id, author_id = auth.author_id, "Deleting lookup row");
    CatalogService::delete(state.db(), L::TABLE, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
