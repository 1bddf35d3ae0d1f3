//! Filter/Sort planner
//!
//! Turns untrusted listing parameters into a [`QueryPlan`]: an AND of
//! predicates plus an optional ordering. Column names only ever come from the
//! closed [`SortField`] whitelist; user values are always bound parameters.

use recipe_catalog_shared::SortField;
use sqlx::{Postgres, QueryBuilder};
use thiserror::Error;

/// Rejection of listing parameters, raised before any storage access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("sort field not found: {0}")]
    UnknownSortField(String),

    #[error("page must be at least 1, got {0}")]
    InvalidPage(i64),

    #[error("malformed query parameter {name}: {value}")]
    Malformed { name: String, value: String },
}

/// Listing filters as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Case-insensitive substring of the title
    pub title_like: Option<String>,
    /// Recipes must contain every one of these ingredients
    pub ingredient_ids: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Ordering instruction: `title` ascends, `-title` descends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn parse(token: &str) -> Result<Self, PlanError> {
        let (direction, name) = match token.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest),
            None => (SortDirection::Asc, token),
        };

        let field = SortField::from_token(name)
            .ok_or_else(|| PlanError::UnknownSortField(name.to_string()))?;

        Ok(Self { field, direction })
    }
}

/// One conjunct of the listing predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `title ILIKE %value%`, with LIKE wildcards in the value escaped
    TitleContains(String),
    /// The recipe's ingredient set is a superset of these distinct ids
    HasAllIngredients(Vec<i32>),
}

impl Predicate {
    fn push_sql<'args>(&self, qb: &mut QueryBuilder<'args, Postgres>) {
        match self {
            Predicate::TitleContains(needle) => {
                qb.push("r.title ILIKE ");
                qb.push_bind(format!("%{}%", escape_like(needle)));
                qb.push(" ESCAPE '\\'");
            }
            Predicate::HasAllIngredients(ids) => {
                qb.push(
                    "r.id IN (SELECT ri.recipe_id FROM recipe_ingredients ri \
                     WHERE ri.ingredient_id = ANY(",
                );
                qb.push_bind(ids.clone());
                qb.push(") GROUP BY ri.recipe_id HAVING COUNT(DISTINCT ri.ingredient_id) = ");
                qb.push_bind(ids.len() as i64);
                qb.push(")");
            }
        }
    }
}

/// Validated predicate and ordering for a recipe listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    predicates: Vec<Predicate>,
    order: Option<SortOrder>,
}

impl QueryPlan {
    /// Plan matching every recipe that uses the given ingredient
    pub fn for_ingredient(ingredient_id: i32) -> Self {
        Self {
            predicates: vec![Predicate::HasAllIngredients(vec![ingredient_id])],
            order: None,
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order(&self) -> Option<SortOrder> {
        self.order
    }

    /// Append ` WHERE ...` when there is at least one predicate
    pub fn push_where<'args>(&self, qb: &mut QueryBuilder<'args, Postgres>) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            predicate.push_sql(qb);
        }
    }

    /// Append ` ORDER BY ...`, always tie-broken by primary key so that
    /// offset pagination is deterministic
    pub fn push_order_by<'args>(&self, qb: &mut QueryBuilder<'args, Postgres>) {
        qb.push(" ORDER BY ");
        match self.order {
            Some(SortOrder {
                field: SortField::Id,
                direction,
            }) => {
                qb.push("r.id ").push(direction.sql());
            }
            Some(SortOrder { field, direction }) => {
                qb.push("r.")
                    .push(field.column_name())
                    .push(" ")
                    .push(direction.sql())
                    .push(", r.id ASC");
            }
            None => {
                qb.push("r.id ASC");
            }
        }
    }
}

/// Build the plan for a listing request
pub fn plan(filter: &RecipeFilter, sort: Option<&str>) -> Result<QueryPlan, PlanError> {
    let order = match sort {
        Some(token) if !token.is_empty() => Some(SortOrder::parse(token)?),
        _ => None,
    };

    let mut predicates = Vec::new();

    if let Some(needle) = filter.title_like.as_deref().filter(|s| !s.is_empty()) {
        predicates.push(Predicate::TitleContains(needle.to_string()));
    }

    if !filter.ingredient_ids.is_empty() {
        let mut ids = filter.ingredient_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        predicates.push(Predicate::HasAllIngredients(ids));
    }

    Ok(QueryPlan { predicates, order })
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
