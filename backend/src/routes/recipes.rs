//! Recipe routes
//!
//! Query strings are read as raw key/value pairs so that `ingredientId`,
//! `include` and `select` may either repeat or carry comma separated values.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::query::{PageRequest, PlanError, RecipeFilter};
use crate::services::RecipeService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use recipe_catalog_shared::types::{RecipeRead, RecipeWrite};
use recipe_catalog_shared::Relation;

/// Raw query pairs in request order
type QueryPairs = Query<Vec<(String, String)>>;

/// Create recipe routes
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route(
            "/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

/// Parameters of `GET /recipes`
#[derive(Debug, Default, PartialEq, Eq)]
struct ListParams {
    page: Option<i64>,
    size: Option<i64>,
    sort: Option<String>,
    filter: RecipeFilter,
}

/// Parameters of `GET /ingredients/:id/recipes`
#[derive(Debug, Default, PartialEq, Eq)]
struct ProjectionParams {
    include: Vec<Relation>,
    select: Vec<String>,
}

fn split_values(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|v| !v.is_empty())
}

fn malformed(name: &str, value: &str) -> PlanError {
    PlanError::Malformed {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn parse_list_params(pairs: &[(String, String)]) -> Result<ListParams, PlanError> {
    let mut params = ListParams::default();

    for (key, value) in pairs {
        match key.as_str() {
            "page" => {
                params.page = Some(value.trim().parse().map_err(|_| malformed(key, value))?);
            }
            "size" => {
                params.size = Some(value.trim().parse().map_err(|_| malformed(key, value))?);
            }
            "sort" => params.sort = Some(value.trim().to_string()),
            "name__like" => params.filter.title_like = Some(value.clone()),
            "ingredientId" => {
                for id in split_values(value) {
                    let id = id.parse::<i32>().map_err(|_| malformed(key, id))?;
                    params.filter.ingredient_ids.push(id);
                }
            }
            _ => {}
        }
    }

    Ok(params)
}

fn parse_projection_params(pairs: &[(String, String)]) -> Result<ProjectionParams, ApiError> {
    let mut params = ProjectionParams::default();

    for (key, value) in pairs {
        match key.as_str() {
            "include" => {
                for token in split_values(value) {
                    let relation: Relation = token.parse()?;
                    if !params.include.contains(&relation) {
                        params.include.push(relation);
                    }
                }
            }
            "select" => params
                .select
                .extend(split_values(value).map(str::to_string)),
            _ => {}
        }
    }

    Ok(params)
}

/// GET /api/v1/recipes
async fn list_recipes(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> ApiResult<Json<Vec<RecipeRead>>> {
    let params = parse_list_params(&pairs)?;
    let page = PageRequest::new(params.page, params.size)?;

    let recipes =
        RecipeService::list(state.db(), &params.filter, params.sort.as_deref(), page).await?;
    Ok(Json(recipes))
}

/// GET /api/v1/recipes/:id
async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<RecipeRead>> {
    let recipe = RecipeService::get(state.db(), id).await?;
    Ok(Json(recipe))
}

/// POST /api/v1/recipes
///
/// The author is the authenticated caller.
async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<RecipeWrite>,
) -> ApiResult<(StatusCode, Json<RecipeRead>)> {
    let recipe = RecipeService::create(state.db(), &auth, &input).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// PUT /api/v1/recipes/:id
async fn update_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<RecipeWrite>,
) -> ApiResult<Json<RecipeRead>> {
    let recipe = RecipeService::update(state.db(), state.policy(), &auth, id, &input).await?;
    Ok(Json(recipe))
}

/// DELETE /api/v1/recipes/:id
async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    RecipeService::delete(state.db(), state.policy(), &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/ingredients/:id/recipes
pub async fn list_by_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<i32>,
    Query(pairs): QueryPairs,
) -> ApiResult<Json<Vec<RecipeRead>>> {
    let params = parse_projection_params(&pairs)?;

    let recipes = RecipeService::list_by_ingredient(
        state.db(),
        ingredient_id,
        &params.include,
        params.select.as_slice(),
    )
    .await?;
    Ok(Json(recipes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(parse_list_params(&[]).unwrap(), ListParams::default());
    }

    #[test]
    fn test_full_list_query() {
        let params = parse_list_params(&pairs(&[
            ("page", "2"),
            ("size", "5"),
            ("name__like", "soup"),
            ("sort", "-cookingTime"),
            ("ingredientId", "3"),
        ]))
        .unwrap();
        assert_eq!(params.page, Some(2));
        assert_eq!(params.size, Some(5));
        assert_eq!(params.sort.as_deref(), Some("-cookingTime"));
        assert_eq!(params.filter.title_like.as_deref(), Some("soup"));
        assert_eq!(params.filter.ingredient_ids, vec![3]);
    }

    #[rstest]
    #[case(&[("ingredientId", "1"), ("ingredientId", "2")])]
    #[case(&[("ingredientId", "1,2")])]
    #[case(&[("ingredientId", " 1 , 2 ,")])]
    fn test_ingredient_ids_repeat_or_comma(#[case] raw: &[(&str, &str)]) {
        let params = parse_list_params(&pairs(raw)).unwrap();
        assert_eq!(params.filter.ingredient_ids, vec![1, 2]);
    }

    #[rstest]
    #[case("ingredientId", "one")]
    #[case("page", "first")]
    #[case("size", "1.5")]
    fn test_malformed_values(#[case] key: &str, #[case] value: &str) {
        let err = parse_list_params(&pairs(&[(key, value)])).unwrap_err();
        assert!(matches!(err, PlanError::Malformed { .. }));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let params = parse_list_params(&pairs(&[("utm_source", "mail")])).unwrap();
        assert_eq!(params, ListParams::default());
    }

    #[test]
    fn test_projection_params() {
        let params = parse_projection_params(&pairs(&[
            ("include", "cuisine,allergens"),
            ("include", "cuisine"),
            ("select", "title,difficulty"),
            ("select", "bogus"),
        ]))
        .unwrap();
        assert_eq!(params.include, vec![Relation::Cuisine, Relation::Allergens]);
        assert_eq!(params.select, vec!["title", "difficulty", "bogus"]);
    }

    #[test]
    fn test_unknown_include_is_rejected() {
        let err = parse_projection_params(&pairs(&[("include", "author")])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
