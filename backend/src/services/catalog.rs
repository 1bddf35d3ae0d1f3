//! Cuisine, allergen and ingredient management
//!
//! A row that recipe data still references cannot be deleted.

use super::recipe::finish;
use crate::db::{self, ConstraintViolation};
use crate::error::ApiError;
use crate::repositories::{CatalogRepository, LookupRow, LookupTable};
use recipe_catalog_shared::types::{CatalogItem, CatalogItemWrite};
use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use validator::Validate;

/// Lookup-table service
pub struct CatalogService;

impl CatalogService {
    pub async fn list(db: &PgPool, table: LookupTable) -> Result<Vec<CatalogItem>, ApiError> {
        let rows = CatalogRepository::list(db, table)
            .await
            .map_err(ApiError::Internal)?;
        Ok(rows.into_iter().map(to_item).collect())
    }

    pub async fn get(db: &PgPool, table: LookupTable, id: i32) -> Result<CatalogItem, ApiError> {
        CatalogRepository::find_by_id(db, table, id)
            .await
            .map_err(ApiError::Internal)?
            .map(to_item)
            .ok_or_else(|| not_found(table))
    }

    pub async fn create(
        db: &PgPool,
        table: LookupTable,
        input: &CatalogItemWrite,
    ) -> Result<CatalogItem, ApiError> {
        input.validate()?;

        let row = CatalogRepository::create(db, table, input.name.trim())
            .await
            .map_err(|e| duplicate_name(table, e))?;

        info!(table = table.table(), id = row.id, "Lookup row created");
        Ok(to_item(row))
    }

    pub async fn rename(
        db: &PgPool,
        table: LookupTable,
        id: i32,
        input: &CatalogItemWrite,
    ) -> Result<CatalogItem, ApiError> {
        input.validate()?;

        CatalogRepository::rename(db, table, id, input.name.trim())
            .await
            .map_err(|e| duplicate_name(table, e))?
            .map(to_item)
            .ok_or_else(|| not_found(table))
    }

    /// Delete a row nothing references
    pub async fn delete(db: &PgPool, table: LookupTable, id: i32) -> Result<(), ApiError> {
        let mut tx = db.begin().await?;
        let outcome = Self::delete_in(&mut tx, table, id).await;
        finish(tx, outcome).await?;

        info!(table = table.table(), id, "Lookup row deleted");
        Ok(())
    }

    async fn delete_in(conn: &mut PgConnection, table: LookupTable, id: i32) -> Result<(), ApiError> {
        if !CatalogRepository::lock(conn, table, id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(not_found(table));
        }

        let references = CatalogRepository::reference_count(conn, table, id)
            .await
            .map_err(ApiError::Internal)?;
        if references > 0 {
            warn!(table = table.table(), id, references, "Refusing to delete referenced row");
            return Err(still_referenced(table, references));
        }

        let deleted = CatalogRepository::delete(conn, table, id)
            .await
            .map_err(|e| match db::constraint_violation(&e) {
                Some(ConstraintViolation::ForeignKey) => still_referenced(table, 1),
                _ => ApiError::Internal(e),
            })?;
        if !deleted {
            return Err(not_found(table));
        }
        Ok(())
    }
}

fn to_item(row: LookupRow) -> CatalogItem {
    CatalogItem {
        id: row.id,
        name: row.name,
    }
}

fn not_found(table: LookupTable) -> ApiError {
    ApiError::NotFound(format!("{} with this id not found", table.label()))
}

fn still_referenced(table: LookupTable, references: i64) -> ApiError {
    ApiError::Conflict(format!(
        "{} is used by {} recipe record(s) and cannot be deleted",
        table.label(),
        references
    ))
}

fn duplicate_name(table: LookupTable, err: anyhow::Error) -> ApiError {
    match db::constraint_violation(&err) {
        Some(ConstraintViolation::Unique) => {
            ApiError::Conflict(format!("{} with this name already exists", table.label()))
        }
        _ => ApiError::from_storage(err),
    }
}
