//! Recipe serializer
//!
//! Flattens a loaded [`RecipeAggregate`] into the public [`RecipeRead`] shape.
//! Base columns are emitted only when the fetch plan selects them, relations
//! only when it includes them. Foreign-key columns are never emitted.

use crate::query::FetchPlan;
use crate::repositories::{AuthorRow, LookupRow, RecipeAggregate, RecipeIngredientRow};
use anyhow::{Context, Result};
use recipe_catalog_shared::types::{AuthorSummary, CatalogItem, RecipeIngredientRead, RecipeRead};
use recipe_catalog_shared::{Measurement, RecipeColumn};

/// Flatten one aggregate
///
/// Fails only when a stored measurement code is outside the closed set.
pub fn flatten(aggregate: RecipeAggregate, plan: &FetchPlan) -> Result<RecipeRead> {
    let RecipeAggregate {
        recipe,
        author,
        cuisine,
        allergens,
        ingredients,
    } = aggregate;

    let ingredients = ingredients
        .map(|rows| rows.into_iter().map(ingredient).collect::<Result<Vec<_>>>())
        .transpose()?;

    Ok(RecipeRead {
        id: plan.selects(RecipeColumn::Id).then_some(recipe.id),
        title: recipe.title.filter(|_| plan.selects(RecipeColumn::Title)),
        description: recipe
            .description
            .filter(|_| plan.selects(RecipeColumn::Description)),
        cooking_time: recipe
            .cooking_time
            .filter(|_| plan.selects(RecipeColumn::CookingTime)),
        difficulty: recipe
            .difficulty
            .filter(|_| plan.selects(RecipeColumn::Difficulty)),
        author: author.filter(|_| plan.include_author).map(author_summary),
        cuisine: cuisine.filter(|_| plan.include_cuisine).map(catalog_item),
        allergens: allergens.filter(|_| plan.include_allergens).map(|rows| {
            rows.into_iter()
                .map(|a| CatalogItem {
                    id: a.allergen_id,
                    name: a.allergen_name,
                })
                .collect()
        }),
        ingredients: ingredients.filter(|_| plan.include_ingredients),
    })
}

/// Flatten a page of aggregates, keeping their order
pub fn flatten_all(aggregates: Vec<RecipeAggregate>, plan: &FetchPlan) -> Result<Vec<RecipeRead>> {
    aggregates.into_iter().map(|a| flatten(a, plan)).collect()
}

fn ingredient(row: RecipeIngredientRow) -> Result<RecipeIngredientRead> {
    let measurement = Measurement::from_code(row.measurement)
        .with_context(|| format!("recipe ingredient row {}", row.id))?;

    Ok(RecipeIngredientRead {
        id: row.ingredient_id,
        quantity: row.quantity,
        measurement,
        name: row.ingredient_name,
    })
}

fn catalog_item(row: LookupRow) -> CatalogItem {
    CatalogItem {
        id: row.id,
        name: row.name,
    }
}

fn author_summary(row: AuthorRow) -> AuthorSummary {
    AuthorSummary {
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{RecipeAllergenRow, RecipeRow};
    use recipe_catalog_shared::Relation;
    use serde_json::json;

    fn aggregate() -> RecipeAggregate {
        RecipeAggregate {
            recipe: RecipeRow {
                id: 7,
                title: Some("Carbonara".into()),
                description: Some("Eggs, cheese, pork".into()),
                cooking_time: Some(20),
                difficulty: Some(2),
                cuisine_id: Some(1),
                author_id: Some(3),
            },
            author: Some(AuthorRow {
                id: 3,
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
            }),
            cuisine: Some(LookupRow {
                id: 1,
                name: "Italian".into(),
            }),
            allergens: Some(vec![RecipeAllergenRow {
                recipe_id: 7,
                allergen_id: 2,
                allergen_name: "Milk".into(),
            }]),
            ingredients: Some(vec![RecipeIngredientRow {
                id: 40,
                recipe_id: 7,
                ingredient_id: 9,
                quantity: 200,
                measurement: 1,
                ingredient_name: "Spaghetti".into(),
            }]),
        }
    }

    #[test]
    fn test_full_read_shape() {
        let read = flatten(aggregate(), &FetchPlan::full()).unwrap();
        assert_eq!(
            serde_json::to_value(&read).unwrap(),
            json!({
                "id": 7,
                "title": "Carbonara",
                "description": "Eggs, cheese, pork",
                "cookingTime": 20,
                "difficulty": 2,
                "author": {"id": 3, "firstName": "Ada", "lastName": "Lovelace"},
                "cuisine": {"id": 1, "name": "Italian"},
                "allergens": [{"id": 2, "name": "Milk"}],
                "ingredients": [
                    {"id": 9, "quantity": 200, "measurement": "GRAMS", "name": "Spaghetti"}
                ]
            })
        );
    }

    #[test]
    fn test_foreign_keys_are_never_emitted() {
        let value = serde_json::to_value(flatten(aggregate(), &FetchPlan::full()).unwrap()).unwrap();
        assert!(value.get("cuisineId").is_none());
        assert!(value.get("authorId").is_none());
    }

    #[test]
    fn test_projection_without_relations() {
        let plan = FetchPlan::plan(&[], &["title"]);
        let value = serde_json::to_value(flatten(aggregate(), &plan).unwrap()).unwrap();
        assert_eq!(value, json!({"title": "Carbonara"}));
    }

    #[test]
    fn test_included_relation_with_no_rows_is_empty_list() {
        let mut agg = aggregate();
        agg.allergens = Some(Vec::new());
        let plan = FetchPlan::plan(&[Relation::Allergens], &["id"]);
        let value = serde_json::to_value(flatten(agg, &plan).unwrap()).unwrap();
        assert_eq!(value, json!({"id": 7, "allergens": []}));
    }

    #[test]
    fn test_ingredient_uses_ingredient_id_not_join_row_id() {
        let read = flatten(aggregate(), &FetchPlan::full()).unwrap();
        let ingredients = read.ingredients.unwrap();
        assert_eq!(ingredients[0].id, 9);
    }

    #[test]
    fn test_unknown_measurement_code_fails() {
        let mut agg = aggregate();
        if let Some(rows) = agg.ingredients.as_mut() {
            rows[0].measurement = 9;
        }
        assert!(flatten(agg, &FetchPlan::full()).is_err());
    }

    #[test]
    fn test_flatten_all_keeps_order() {
        let mut second = aggregate();
        second.recipe.id = 8;
        let reads = flatten_all(vec![aggregate(), second], &FetchPlan::full()).unwrap();
        let ids: Vec<_> = reads.iter().map(|r| r.id.unwrap()).collect();
        assert_eq!(ids, vec![7, 8]);
    }
}
