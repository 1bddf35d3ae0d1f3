//! Domain enums for the recipe catalog
//!
//! Every enum here is closed: values outside the listed variants are rejected
//! at the boundary and never reach storage.

use crate::errors::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measurement unit of an ingredient entry in a recipe
///
/// Stored as a SMALLINT (1 = grams, 2 = pieces, 3 = milliliters). Serialized
/// by name; input accepts either the name or the storage code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "MeasurementInput")]
pub enum Measurement {
    Grams,
    Pieces,
    Milliliters,
}

/// Accepted input forms of a measurement
#[derive(Deserialize)]
#[serde(untagged)]
pub enum MeasurementInput {
    Code(i16),
    Name(String),
}

impl TryFrom<MeasurementInput> for Measurement {
    type Error = CatalogError;

    fn try_from(input: MeasurementInput) -> Result<Self, Self::Error> {
        match input {
            MeasurementInput::Code(code) => Self::from_code(code),
            MeasurementInput::Name(name) => name.parse(),
        }
    }
}

impl FromStr for Measurement {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GRAMS" => Ok(Measurement::Grams),
            "PIECES" => Ok(Measurement::Pieces),
            "MILLILITERS" => Ok(Measurement::Milliliters),
            other => Err(CatalogError::UnknownMeasurement(other.to_string())),
        }
    }
}

impl Measurement {
    /// Storage code of the unit
    pub fn code(self) -> i16 {
        match self {
            Measurement::Grams => 1,
            Measurement::Pieces => 2,
            Measurement::Milliliters => 3,
        }
    }

    /// Decode a storage code
    pub fn from_code(code: i16) -> Result<Self, CatalogError> {
        match code {
            1 => Ok(Measurement::Grams),
            2 => Ok(Measurement::Pieces),
            3 => Ok(Measurement::Milliliters),
            other => Err(CatalogError::InvalidMeasurement(other)),
        }
    }
}

impl TryFrom<i16> for Measurement {
    type Error = CatalogError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

/// Base column of the recipe table that a caller may project with `select`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecipeColumn {
    Id,
    Title,
    Description,
    CookingTime,
    Difficulty,
}

impl RecipeColumn {
    pub const ALL: [RecipeColumn; 5] = [
        RecipeColumn::Id,
        RecipeColumn::Title,
        RecipeColumn::Description,
        RecipeColumn::CookingTime,
        RecipeColumn::Difficulty,
    ];

    /// Public token as it appears in query strings and JSON
    pub fn token(self) -> &'static str {
        match self {
            RecipeColumn::Id => "id",
            RecipeColumn::Title => "title",
            RecipeColumn::Description => "description",
            RecipeColumn::CookingTime => "cookingTime",
            RecipeColumn::Difficulty => "difficulty",
        }
    }

    /// Column name in the `recipes` table
    pub fn column_name(self) -> &'static str {
        match self {
            RecipeColumn::Id => "id",
            RecipeColumn::Title => "title",
            RecipeColumn::Description => "description",
            RecipeColumn::CookingTime => "cooking_time",
            RecipeColumn::Difficulty => "difficulty",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.token() == token)
    }
}

/// Recipe column a listing may be ordered by
///
/// Only the recipe's own columns are sortable; relation-derived fields
/// (cuisine name, author name, ...) are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Title,
    Description,
    CookingTime,
    Difficulty,
    CuisineId,
    AuthorId,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Id,
        SortField::Title,
        SortField::Description,
        SortField::CookingTime,
        SortField::Difficulty,
        SortField::CuisineId,
        SortField::AuthorId,
    ];

    pub fn token(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Description => "description",
            SortField::CookingTime => "cookingTime",
            SortField::Difficulty => "difficulty",
            SortField::CuisineId => "cuisineId",
            SortField::AuthorId => "authorId",
        }
    }

    pub fn column_name(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Description => "description",
            SortField::CookingTime => "cooking_time",
            SortField::Difficulty => "difficulty",
            SortField::CuisineId => "cuisine_id",
            SortField::AuthorId => "author_id",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.token() == token)
    }
}

/// Relation of a recipe that a read may eagerly include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Cuisine,
    Ingredients,
    Allergens,
}

impl Relation {
    pub fn token(self) -> &'static str {
        match self {
            Relation::Cuisine => "cuisine",
            Relation::Ingredients => "ingredients",
            Relation::Allergens => "allergens",
        }
    }
}

impl FromStr for Relation {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cuisine" => Ok(Relation::Cuisine),
            "ingredients" => Ok(Relation::Ingredients),
            "allergens" => Ok(Relation::Allergens),
            other => Err(CatalogError::UnknownRelation(other.to_string())),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
