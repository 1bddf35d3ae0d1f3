//! Recipe aggregate repository
//!
//! A recipe and its allergen/ingredient join rows form one aggregate. Reads
//! fetch the base rows first and then attach each included relation with one
//! batched query per relation. Writes take a `&mut PgConnection` so that the
//! service can run them inside a single transaction.

use super::author::{AuthorRepository, AuthorRow};
use super::catalog::{CatalogRepository, LookupRow, LookupTable};
use crate::query::{FetchPlan, PageRequest, QueryPlan};
use anyhow::{anyhow, Result};
use recipe_catalog_shared::types::{IngredientEntry, RecipeWrite};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::debug;

/// Base recipe row; columns outside the fetch plan stay `None`
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct RecipeRow {
    pub id: i32,
    #[sqlx(default)]
    pub title: Option<String>,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub cooking_time: Option<i32>,
    #[sqlx(default)]
    pub difficulty: Option<i32>,
    #[sqlx(default)]
    pub cuisine_id: Option<i32>,
    #[sqlx(default)]
    pub author_id: Option<i32>,
}

/// Allergen join row with the allergen's name
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RecipeAllergenRow {
    pub recipe_id: i32,
    pub allergen_id: i32,
    pub allergen_name: String,
}

/// Ingredient join row with the ingredient's name
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RecipeIngredientRow {
    /// Synthetic id of the join row itself
    pub id: i32,
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub quantity: i32,
    pub measurement: i16,
    pub ingredient_name: String,
}

/// A recipe with the relations its fetch plan asked for
///
/// A relation that was not requested is `None`; a requested to-many relation
/// with no rows is `Some(vec![])`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeAggregate {
    pub recipe: RecipeRow,
    pub author: Option<AuthorRow>,
    pub cuisine: Option<LookupRow>,
    pub allergens: Option<Vec<RecipeAllergenRow>>,
    pub ingredients: Option<Vec<RecipeIngredientRow>>,
}

/// Recipe aggregate repository
pub struct RecipeRepository;

impl RecipeRepository {
    // ==================== Reads ====================

    /// Page through recipes matching a query plan
    pub async fn list(
        conn: &mut PgConnection,
        query: &QueryPlan,
        page: PageRequest,
        fetch: &FetchPlan,
    ) -> Result<Vec<RecipeAggregate>> {
        let mut qb = base_query(fetch, query);
        qb.push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        debug!(sql = qb.sql(), "Listing recipes");
        let rows = qb.build_query_as::<RecipeRow>().fetch_all(&mut *conn).await?;

        Self::attach(conn, rows, fetch).await
    }

    /// Every recipe matching a query plan, unpaged
    pub async fn list_all(
        conn: &mut PgConnection,
        query: &QueryPlan,
        fetch: &FetchPlan,
    ) -> Result<Vec<RecipeAggregate>> {
        let mut qb = base_query(fetch, query);

        debug!(sql = qb.sql(), "Listing recipes");
        let rows = qb.build_query_as::<RecipeRow>().fetch_all(&mut *conn).await?;

        Self::attach(conn, rows, fetch).await
    }

    /// Load one aggregate by id
    pub async fn find(
        conn: &mut PgConnection,
        id: i32,
        fetch: &FetchPlan,
    ) -> Result<Option<RecipeAggregate>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(fetch.select_list())
            .push(" FROM recipes r WHERE r.id = ")
            .push_bind(id);

        let row = qb
            .build_query_as::<RecipeRow>()
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => Ok(Self::attach(conn, vec![row], fetch).await?.pop()),
            None => Ok(None),
        }
    }

    async fn attach(
        conn: &mut PgConnection,
        rows: Vec<RecipeRow>,
        fetch: &FetchPlan,
    ) -> Result<Vec<RecipeAggregate>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let recipe_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

        let cuisines = if fetch.include_cuisine {
            let ids = distinct(rows.iter().filter_map(|r| r.cuisine_id));
            let found = CatalogRepository::find_many(conn, LookupTable::Cuisines, &ids).await?;
            Some(index_by(found, |c| c.id))
        } else {
            None
        };

        let authors = if fetch.include_author {
            let ids = distinct(rows.iter().filter_map(|r| r.author_id));
            let found = AuthorRepository::find_many(conn, &ids).await?;
            Some(index_by(found, |a| a.id))
        } else {
            None
        };

        let mut allergens = if fetch.include_allergens {
            Some(group_by(
                Self::allergens_for(conn, &recipe_ids).await?,
                |a| a.recipe_id,
            ))
        } else {
            None
        };

        let mut ingredients = if fetch.include_ingredients {
            Some(group_by(
                Self::ingredients_for(conn, &recipe_ids).await?,
                |i| i.recipe_id,
            ))
        } else {
            None
        };

        rows.into_iter()
            .map(|recipe| {
                let cuisine = resolve(cuisines.as_ref(), recipe.cuisine_id, recipe.id, "cuisine")?;
                let author = resolve(authors.as_ref(), recipe.author_id, recipe.id, "author")?;
                let allergens = allergens
                    .as_mut()
                    .map(|by_recipe| by_recipe.remove(&recipe.id).unwrap_or_default());
                let ingredients = ingredients
                    .as_mut()
                    .map(|by_recipe| by_recipe.remove(&recipe.id).unwrap_or_default());

                Ok(RecipeAggregate {
                    recipe,
                    author,
                    cuisine,
                    allergens,
                    ingredients,
                })
            })
            .collect()
    }

    async fn allergens_for(
        conn: &mut PgConnection,
        recipe_ids: &[i32],
    ) -> Result<Vec<RecipeAllergenRow>> {
        let rows = sqlx::query_as::<_, RecipeAllergenRow>(
            r#"
            SELECT ra.recipe_id, a.id AS allergen_id, a.name AS allergen_name
            FROM recipe_allergens ra
            JOIN allergens a ON a.id = ra.allergen_id
            WHERE ra.recipe_id = ANY($1)
            ORDER BY ra.recipe_id, a.id
            "#,
        )
        .bind(recipe_ids)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    async fn ingredients_for(
        conn: &mut PgConnection,
        recipe_ids: &[i32],
    ) -> Result<Vec<RecipeIngredientRow>> {
        let rows = sqlx::query_as::<_, RecipeIngredientRow>(
            r#"
            SELECT ri.id, ri.recipe_id, ri.ingredient_id, ri.quantity, ri.measurement,
                   i.name AS ingredient_name
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ANY($1)
            ORDER BY ri.recipe_id, ri.id
            "#,
        )
        .bind(recipe_ids)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    // ==================== Writes ====================

    /// Lock a recipe row for the rest of the transaction and return its author
    pub async fn lock_owner(conn: &mut PgConnection, id: i32) -> Result<Option<i32>> {
        let owner: Option<i32> =
            sqlx::query_scalar("SELECT author_id FROM recipes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(owner)
    }

    /// Insert the base row and return the new id
    pub async fn insert(conn: &mut PgConnection, input: &RecipeWrite, author_id: i32) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO recipes (title, description, cooking_time, difficulty, cuisine_id, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.cooking_time)
        .bind(input.difficulty)
        .bind(input.cuisine_id)
        .bind(author_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Overwrite the base row; the author never changes
    pub async fn update(conn: &mut PgConnection, id: i32, input: &RecipeWrite) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE recipes
            SET title = $2, description = $3, cooking_time = $4, difficulty = $5, cuisine_id = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.cooking_time)
        .bind(input.difficulty)
        .bind(input.cuisine_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// One join row per distinct allergen id; no statement for an empty list
    pub async fn insert_allergens(
        conn: &mut PgConnection,
        recipe_id: i32,
        allergen_ids: &[i32],
    ) -> Result<u64> {
        let ids = distinct(allergen_ids.iter().copied());
        if ids.is_empty() {
            return Ok(0);
        }

        let mut qb =
            QueryBuilder::<Postgres>::new("INSERT INTO recipe_allergens (recipe_id, allergen_id) ");
        qb.push_values(ids, |mut row, allergen_id| {
            row.push_bind(recipe_id).push_bind(allergen_id);
        });

        let result = qb.build().execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    /// One join row per entry; no statement for an empty list
    pub async fn insert_ingredients(
        conn: &mut PgConnection,
        recipe_id: i32,
        entries: &[IngredientEntry],
    ) -> Result<u64> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, measurement) ",
        );
        qb.push_values(entries, |mut row, entry| {
            row.push_bind(recipe_id)
                .push_bind(entry.ingredient_id)
                .push_bind(entry.quantity)
                .push_bind(entry.measurement.code());
        });

        let result = qb.build().execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    /// Delete every allergen join row of a recipe, then insert the new set
    pub async fn replace_allergens(
        conn: &mut PgConnection,
        recipe_id: i32,
        allergen_ids: &[i32],
    ) -> Result<()> {
        let removed = Self::delete_allergens(conn, recipe_id).await?;
        let inserted = Self::insert_allergens(conn, recipe_id, allergen_ids).await?;
        debug!(recipe_id, removed, inserted, "Replaced recipe allergens");
        Ok(())
    }

    /// Delete every ingredient join row of a recipe, then insert the new set
    pub async fn replace_ingredients(
        conn: &mut PgConnection,
        recipe_id: i32,
        entries: &[IngredientEntry],
    ) -> Result<()> {
        let removed = Self::delete_ingredients(conn, recipe_id).await?;
        let inserted = Self::insert_ingredients(conn, recipe_id, entries).await?;
        debug!(recipe_id, removed, inserted, "Replaced recipe ingredients");
        Ok(())
    }

    pub async fn delete_allergens(conn: &mut PgConnection, recipe_id: i32) -> Result<u64> {
        let result = sqlx::query("DELETE FROM recipe_allergens WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_ingredients(conn: &mut PgConnection, recipe_id: i32) -> Result<u64> {
        let result = sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete the base row; join rows must already be gone
    pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<u64> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}

/// `SELECT <plan columns> FROM recipes r [WHERE ...] ORDER BY ...`
fn base_query<'args>(fetch: &FetchPlan, query: &QueryPlan) -> QueryBuilder<'args, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
    qb.push(fetch.select_list()).push(" FROM recipes r");
    query.push_where(&mut qb);
    query.push_order_by(&mut qb);
    qb
}

/// Distinct values, first occurrence wins
fn distinct<T: Copy + Eq + Hash>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

fn index_by<T>(items: Vec<T>, key: impl Fn(&T) -> i32) -> HashMap<i32, T> {
    items.into_iter().map(|item| (key(&item), item)).collect()
}

fn group_by<T>(items: Vec<T>, key: impl Fn(&T) -> i32) -> HashMap<i32, Vec<T>> {
    let mut groups: HashMap<i32, Vec<T>> = HashMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

/// Look up a to-one relation that the plan included
fn resolve<T: Clone>(
    index: Option<&HashMap<i32, T>>,
    key: Option<i32>,
    recipe_id: i32,
    relation: &str,
) -> Result<Option<T>> {
    let Some(index) = index else {
        return Ok(None);
    };
    let key = key.ok_or_else(|| anyhow!("recipe {} was loaded without its {} key", recipe_id, relation))?;
    index
        .get(&key)
        .cloned()
        .map(Some)
        .ok_or_else(|| anyhow!("recipe {} references missing {} {}", recipe_id, relation, key))
}
