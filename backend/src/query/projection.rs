//! Projection planner
//!
//! `include` and `select` are independent axes: relations to fetch and base
//! columns to return. The resulting [`FetchPlan`] drives both the repository
//! (what to query) and the serializer (what to emit).

use recipe_catalog_shared::{RecipeColumn, Relation};
use std::collections::BTreeSet;

/// Relations and columns a recipe read returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub include_cuisine: bool,
    pub include_allergens: bool,
    pub include_ingredients: bool,
    pub include_author: bool,
    columns: BTreeSet<RecipeColumn>,
}

impl FetchPlan {
    /// Default read: every base column and every relation, author included
    pub fn full() -> Self {
        Self {
            include_cuisine: true,
            include_allergens: true,
            include_ingredients: true,
            include_author: true,
            columns: RecipeColumn::ALL.into_iter().collect(),
        }
    }

    /// Plan an optional-inclusion read
    ///
    /// No `include` means no relations. Unknown `select` tokens are dropped;
    /// an empty (or entirely unknown) selection means all base columns.
    pub fn plan<S: AsRef<str>>(include: &[Relation], select: &[S]) -> Self {
        let mut columns: BTreeSet<RecipeColumn> = select
            .iter()
            .filter_map(|token| RecipeColumn::from_token(token.as_ref()))
            .collect();
        if columns.is_empty() {
            columns = RecipeColumn::ALL.into_iter().collect();
        }

        Self {
            include_cuisine: include.contains(&Relation::Cuisine),
            include_allergens: include.contains(&Relation::Allergens),
            include_ingredients: include.contains(&Relation::Ingredients),
            include_author: false,
            columns,
        }
    }

    /// Whether a base column is part of the output
    pub fn selects(&self, column: RecipeColumn) -> bool {
        self.columns.contains(&column)
    }

    pub fn columns(&self) -> impl Iterator<Item = RecipeColumn> + '_ {
        self.columns.iter().copied()
    }

    /// Select list for the base `recipes r` query
    ///
    /// Always carries `r.id` (relations attach by it) and whichever foreign
    /// keys the included relations need. Every identifier comes from a closed
    /// enum.
    pub fn select_list(&self) -> String {
        let mut parts = vec!["r.id".to_string()];
        parts.extend(
            self.columns()
                .filter(|c| *c != RecipeColumn::Id)
                .map(|c| format!("r.{}", c.column_name())),
        );
        if self.include_cuisine {
            parts.push("r.cuisine_id".to_string());
        }
        if self.include_author {
            parts.push("r.author_id".to_string());
        }
        parts.join(", ")
    }
}

impl Default for FetchPlan {
    fn default() -> Self {
        Self::full()
    }
}
