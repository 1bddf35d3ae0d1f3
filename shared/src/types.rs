//! API request and response types
//!
//! JSON field names are camelCase. Read shapes omit absent members instead of
//! emitting `null`, which is how optional relation inclusion shows up on the
//! wire.

use crate::models::Measurement;
use crate::validation;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn rule(result: Result<(), String>, code: &'static str) -> Result<(), ValidationError> {
    result.map_err(|message| {
        let mut err = ValidationError::new(code);
        err.message = Some(message.into());
        err
    })
}

fn title_rule(title: &str) -> Result<(), ValidationError> {
    rule(validation::validate_title(title), "title")
}

fn name_rule(name: &str) -> Result<(), ValidationError> {
    rule(validation::validate_name(name), "name")
}

fn login_rule(login: &str) -> Result<(), ValidationError> {
    rule(validation::validate_login(login), "login")
}

fn password_rule(password: &str) -> Result<(), ValidationError> {
    rule(validation::validate_password(password), "password")
}

fn ids_rule(ids: &[i32]) -> Result<(), ValidationError> {
    rule(validation::validate_ids(ids), "ids")
}

// ============================================================================
// Common
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Cuisines, allergens and ingredients
// ============================================================================

/// A row of one of the lookup tables (cuisine, allergen, ingredient)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: i32,
    pub name: String,
}

/// Create or rename a lookup-table row
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CatalogItemWrite {
    #[validate(custom(function = "name_rule"))]
    pub name: String,
}

// ============================================================================
// Recipes
// ============================================================================

/// One ingredient entry of a recipe write payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngredientEntry {
    #[validate(range(min = 0))]
    pub ingredient_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub measurement: Measurement,
}

/// Payload for creating or fully replacing a recipe
///
/// The author is never part of the payload; it comes from the caller's
/// identity.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecipeWrite {
    #[validate(custom(function = "title_rule"))]
    pub title: String,
    pub description: String,
    #[validate(range(min = 1))]
    pub cooking_time: i32,
    #[validate(range(min = 1, max = 5))]
    pub difficulty: i32,
    #[validate(range(min = 0))]
    pub cuisine_id: i32,
    #[serde(default)]
    #[validate(custom(function = "ids_rule"))]
    pub allergen_ids: Vec<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<IngredientEntry>,
}

/// Author as embedded in a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// Ingredient as embedded in a recipe: the ingredient's own id and name plus
/// the quantity attributes of the join row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeIngredientRead {
    pub id: i32,
    pub quantity: i32,
    pub measurement: Measurement,
    pub name: String,
}

/// Public read shape of a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<CatalogItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergens: Option<Vec<CatalogItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<RecipeIngredientRead>>,
}

// ============================================================================
// Authors
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(function = "login_rule"))]
    pub login: String,
    #[validate(custom(function = "password_rule"))]
    pub password: String,
    #[validate(custom(function = "name_rule"))]
    pub first_name: String,
    #[validate(custom(function = "name_rule"))]
    pub last_name: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Issued access token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Author profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfile {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
}
