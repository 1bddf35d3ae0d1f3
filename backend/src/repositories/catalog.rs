//! Lookup-table repository - cuisines, allergens and ingredients
//!
//! The three tables share the `{id, name}` shape, so one repository serves
//! all of them, keyed by [`LookupTable`].

use anyhow::Result;
use sqlx::{PgConnection, PgPool};

/// Row of a lookup table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LookupRow {
    pub id: i32,
    pub name: String,
}

/// One of the `{id, name}` tables recipes reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTable {
    Cuisines,
    Allergens,
    Ingredients,
}

impl LookupTable {
    pub fn table(self) -> &'static str {
        match self {
            LookupTable::Cuisines => "cuisines",
            LookupTable::Allergens => "allergens",
            LookupTable::Ingredients => "ingredients",
        }
    }

    /// Singular name used in messages
    pub fn label(self) -> &'static str {
        match self {
            LookupTable::Cuisines => "cuisine",
            LookupTable::Allergens => "allergen",
            LookupTable::Ingredients => "ingredient",
        }
    }

    /// Query counting references to a row from recipe data
    fn reference_count_sql(self) -> &'static str {
        match self {
            LookupTable::Cuisines => "SELECT COUNT(*) FROM recipes WHERE cuisine_id = $1",
            LookupTable::Allergens => {
                "SELECT COUNT(*) FROM recipe_allergens WHERE allergen_id = $1"
            }
            LookupTable::Ingredients => {
                "SELECT COUNT(*) FROM recipe_ingredients WHERE ingredient_id = $1"
            }
        }
    }
}

/// Repository for lookup tables
pub struct CatalogRepository;

impl CatalogRepository {
    /// All rows ordered by id
    pub async fn list(db: &PgPool, table: LookupTable) -> Result<Vec<LookupRow>> {
        let sql = format!("SELECT id, name FROM {} ORDER BY id ASC", table.table());
        let rows = sqlx::query_as::<_, LookupRow>(&sql).fetch_all(db).await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, table: LookupTable, id: i32) -> Result<Option<LookupRow>> {
        let sql = format!("SELECT id, name FROM {} WHERE id = $1", table.table());
        let row = sqlx::query_as::<_, LookupRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    pub async fn exists(db: &PgPool, table: LookupTable, id: i32) -> Result<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table.table());
        let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(db).await?;
        Ok(exists)
    }

    pub async fn create(db: &PgPool, table: LookupTable, name: &str) -> Result<LookupRow> {
        let sql = format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name",
            table.table()
        );
        let row = sqlx::query_as::<_, LookupRow>(&sql)
            .bind(name)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    pub async fn rename(
        db: &PgPool,
        table: LookupTable,
        id: i32,
        name: &str,
    ) -> Result<Option<LookupRow>> {
        let sql = format!(
            "UPDATE {} SET name = $2 WHERE id = $1 RETURNING id, name",
            table.table()
        );
        let row = sqlx::query_as::<_, LookupRow>(&sql)
            .bind(id)
            .bind(name)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    /// Lock a row for deletion, returning whether it exists
    pub async fn lock(conn: &mut PgConnection, table: LookupTable, id: i32) -> Result<bool> {
        let sql = format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", table.table());
        let row: Option<i32> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.is_some())
    }

    /// Number of recipe rows referencing the given row
    pub async fn reference_count(
        conn: &mut PgConnection,
        table: LookupTable,
        id: i32,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(table.reference_count_sql())
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    pub async fn delete(conn: &mut PgConnection, table: LookupTable, id: i32) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table.table());
        let result = sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rows with the given ids, in no particular order
    pub async fn find_many(
        conn: &mut PgConnection,
        table: LookupTable,
        ids: &[i32],
    ) -> Result<Vec<LookupRow>> {
        let sql = format!("SELECT id, name FROM {} WHERE id = ANY($1)", table.table());
        let rows = sqlx::query_as::<_, LookupRow>(&sql)
            .bind(ids)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }
}
