//! Recipe service
//!
//! Reads plan first and touch storage second, so a rejected sort token or page
//! never reaches the database. A read's base query and its relation queries
//! share one repeatable-read snapshot. Every write runs in one transaction: the body
//! executes against the transaction's connection and [`finish`] either commits
//! or rolls back, whatever the outcome.

use crate::auth::{AuthUser, MutationPolicy, OwnedResource};
use crate::db;
use crate::error::ApiError;
use crate::query::{self, FetchPlan, PageRequest, QueryPlan, RecipeFilter};
use crate::repositories::{CatalogRepository, LookupTable, RecipeRepository};
use crate::serializer;
use recipe_catalog_shared::types::{RecipeRead, RecipeWrite};
use recipe_catalog_shared::Relation;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, info, warn};
use validator::Validate;

const RECIPE_NOT_FOUND: &str = "recipe with this id not found";
const INGREDIENT_NOT_FOUND: &str = "ingredient with this id not found";

/// Recipe service
pub struct RecipeService;

impl RecipeService {
    /// List one page of recipes with every relation embedded
    pub async fn list(
        db: &PgPool,
        filter: &RecipeFilter,
        sort: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<RecipeRead>, ApiError> {
        let plan = query::plan(filter, sort)?;
        let fetch = FetchPlan::full();
        debug!(?plan, page = page.page(), size = page.limit(), "Planned recipe listing");

        let mut tx = snapshot(db).await?;
        let outcome = RecipeRepository::list(&mut tx, &plan, page, &fetch)
            .await
            .map_err(ApiError::Internal);
        let aggregates = finish(tx, outcome).await?;

        serializer::flatten_all(aggregates, &fetch).map_err(ApiError::Internal)
    }

    pub async fn get(db: &PgPool, id: i32) -> Result<RecipeRead, ApiError> {
        let fetch = FetchPlan::full();
        let mut tx = snapshot(db).await?;

        let outcome = RecipeRepository::find(&mut tx, id, &fetch)
            .await
            .map_err(ApiError::Internal);
        let aggregate = finish(tx, outcome)
            .await?
            .ok_or_else(|| ApiError::NotFound(RECIPE_NOT_FOUND.to_string()))?;

        serializer::flatten(aggregate, &fetch).map_err(ApiError::Internal)
    }

    /// Every recipe using an ingredient, shaped by `include` and `select`
    pub async fn list_by_ingredient<S: AsRef<str>>(
        db: &PgPool,
        ingredient_id: i32,
        include: &[Relation],
        select: &[S],
    ) -> Result<Vec<RecipeRead>, ApiError> {
        let fetch = FetchPlan::plan(include, select);

        if !CatalogRepository::exists(db, LookupTable::Ingredients, ingredient_id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound(INGREDIENT_NOT_FOUND.to_string()));
        }

        let mut tx = snapshot(db).await?;
        let outcome =
            RecipeRepository::list_all(&mut tx, &QueryPlan::for_ingredient(ingredient_id), &fetch)
                .await
                .map_err(ApiError::Internal);
        let aggregates = finish(tx, outcome).await?;

        serializer::flatten_all(aggregates, &fetch).map_err(ApiError::Internal)
    }

    /// Create a recipe owned by the caller
    pub async fn create(
        db: &PgPool,
        principal: &AuthUser,
        input: &RecipeWrite,
    ) -> Result<RecipeRead, ApiError> {
        input.validate()?;

        let mut tx = db.begin().await?;
        let outcome = Self::create_in(&mut tx, principal.author_id, input).await;
        let recipe = finish(tx, outcome).await?;

        info!(recipe_id = ?recipe.id, author_id = principal.author_id, "Recipe created");
        Ok(recipe)
    }

    async fn create_in(
        conn: &mut PgConnection,
        author_id: i32,
        input: &RecipeWrite,
    ) -> Result<RecipeRead, ApiError> {
        let id = RecipeRepository::insert(conn, input, author_id)
            .await
            .map_err(ApiError::from_storage)?;
        RecipeRepository::insert_allergens(conn, id, &input.allergen_ids)
            .await
            .map_err(ApiError::from_storage)?;
        RecipeRepository::insert_ingredients(conn, id, &input.ingredients)
            .await
            .map_err(ApiError::from_storage)?;

        Self::reread(conn, id).await
    }

    /// Replace a recipe's fields and both association sets
    pub async fn update(
        db: &PgPool,
        policy: &dyn MutationPolicy,
        principal: &AuthUser,
        id: i32,
        input: &RecipeWrite,
    ) -> Result<RecipeRead, ApiError> {
        input.validate()?;

        let mut tx = db.begin().await?;
        let outcome = Self::update_in(&mut tx, policy, principal, id, input).await;
        let recipe = finish(tx, outcome).await?;

        info!(recipe_id = id, author_id = principal.author_id, "Recipe updated");
        Ok(recipe)
    }

    async fn update_in(
        conn: &mut PgConnection,
        policy: &dyn MutationPolicy,
        principal: &AuthUser,
        id: i32,
        input: &RecipeWrite,
    ) -> Result<RecipeRead, ApiError> {
        Self::lock_for_mutation(conn, policy, principal, id).await?;

        RecipeRepository::update(conn, id, input)
            .await
            .map_err(ApiError::from_storage)?;
        RecipeRepository::replace_allergens(conn, id, &input.allergen_ids)
            .await
            .map_err(ApiError::from_storage)?;
        RecipeRepository::replace_ingredients(conn, id, &input.ingredients)
            .await
            .map_err(ApiError::from_storage)?;

        Self::reread(conn, id).await
    }

    /// Delete a recipe and its association rows
    pub async fn delete(
        db: &PgPool,
        policy: &dyn MutationPolicy,
        principal: &AuthUser,
        id: i32,
    ) -> Result<(), ApiError> {
        let mut tx = db.begin().await?;
        let outcome = Self::delete_in(&mut tx, policy, principal, id).await;
        finish(tx, outcome).await?;

        info!(recipe_id = id, author_id = principal.author_id, "Recipe deleted");
        Ok(())
    }

    async fn delete_in(
        conn: &mut PgConnection,
        policy: &dyn MutationPolicy,
        principal: &AuthUser,
        id: i32,
    ) -> Result<(), ApiError> {
        Self::lock_for_mutation(conn, policy, principal, id).await?;

        RecipeRepository::delete_allergens(conn, id)
            .await
            .map_err(ApiError::from_storage)?;
        RecipeRepository::delete_ingredients(conn, id)
            .await
            .map_err(ApiError::from_storage)?;
        let deleted = RecipeRepository::delete(conn, id)
            .await
            .map_err(ApiError::from_storage)?;

        if deleted == 0 {
            return Err(ApiError::NotFound(RECIPE_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    /// Lock the recipe row, then check existence and ownership in that order
    async fn lock_for_mutation(
        conn: &mut PgConnection,
        policy: &dyn MutationPolicy,
        principal: &AuthUser,
        id: i32,
    ) -> Result<(), ApiError> {
        let owner_id = RecipeRepository::lock_owner(conn, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(RECIPE_NOT_FOUND.to_string()))?;

        authorize(policy, principal, OwnedResource { id, owner_id })
    }

    /// Read back what the current transaction just wrote
    async fn reread(conn: &mut PgConnection, id: i32) -> Result<RecipeRead, ApiError> {
        let fetch = FetchPlan::full();
        let aggregate = RecipeRepository::find(conn, id, &fetch)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                ApiError::InternalConsistency(format!(
                    "recipe {} could not be read back after writing it",
                    id
                ))
            })?;

        serializer::flatten(aggregate, &fetch).map_err(ApiError::Internal)
    }
}

fn authorize(
    policy: &dyn MutationPolicy,
    principal: &AuthUser,
    resource: OwnedResource,
) -> Result<(), ApiError> {
    if policy.can_mutate(principal, &resource) {
        return Ok(());
    }

    warn!(
        recipe_id = resource.id,
        owner_id = resource.owner_id,
        author_id = principal.author_id,
        "Rejected recipe mutation by non-owner"
    );
    Err(ApiError::Forbidden(
        "only the author of this recipe may modify it".to_string(),
    ))
}

/// Read-only transaction shared by a read's base and relation queries
async fn snapshot(db: &PgPool) -> Result<Transaction<'static, Postgres>, ApiError> {
    db::begin_snapshot(db).await.map_err(ApiError::Internal)
}

/// Commit on success, roll back on any error
pub(crate) async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    outcome: Result<T, ApiError>,
) -> Result<T, ApiError> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(error = %rollback, "Transaction rollback failed");
            }
            Err(err)
        }
    }
}
