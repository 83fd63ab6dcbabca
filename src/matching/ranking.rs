//! Ranking & Filtering
//!
//! Applies the matcher across a recipe collection for the browse views:
//!
//! 1. Category pre-filter (before aggregation)
//! 2. Aggregation against the pantry snapshot
//! 3. View policy: `Menu` keeps recipes with at least one match, fewest missing first
//! 4. Name search post-filter (case-insensitive prefix)
//!
//! Nothing is cached between calls, so a changed pantry or collection is
//! picked up by simply building the view again.

use serde::Serialize;
use std::collections::HashSet;

use super::matcher::{IngredientMatcher, MatchResult, NormalizedPantry};
use crate::recipe::Recipe;

/// Which browse screen the annotations are built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Only recipes with at least one available ingredient, fewest missing first
    Menu,
    /// Every recipe, catalog order, annotations informational only
    Explore,
}

/// Resolved category pre-filter
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RecipeSelector {
    #[default]
    All,
    /// Cuisine areas, lower-cased
    Areas(HashSet<String>),
    /// Dish category, lower-cased
    Category(String),
    /// Explicit recipe ids (from a catalog listing)
    Ids(HashSet<String>),
}

impl RecipeSelector {
    pub fn areas<I, S>(areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Areas(
            areas
                .into_iter()
                .map(|a| a.as_ref().trim().to_lowercase())
                .collect(),
        )
    }

    pub fn accepts(&self, recipe: &Recipe) -> bool {
        match self {
            Self::All => true,
            Self::Areas(areas) => recipe
                .area
                .as_ref()
                .is_some_and(|a| areas.contains(&a.trim().to_lowercase())),
            Self::Category(category) => recipe
                .category
                .as_ref()
                .is_some_and(|c| c.trim().to_lowercase() == *category),
            Self::Ids(ids) => ids.contains(&recipe.id),
        }
    }
}

/// A recipe together with its match statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRecipe {
    pub recipe: Recipe,
    pub matched_count: usize,
    pub total_count: usize,
}

impl AnnotatedRecipe {
    pub fn new(recipe: Recipe, result: &MatchResult) -> Self {
        Self {
            recipe,
            matched_count: result.matched_count,
            total_count: result.total_count,
        }
    }

    pub fn missing_count(&self) -> usize {
        self.total_count - self.matched_count
    }

    /// "You are missing N ingredients", or `None` for recipes without ingredient data
    pub fn missing_label(&self) -> Option<String> {
        if self.total_count == 0 {
            return None;
        }
        let noun = if self.missing_count() == 1 {
            "ingredient"
        } else {
            "ingredients"
        };
        Some(format!("You are missing {} {}", self.missing_count(), noun))
    }
}

/// Annotate every recipe against the pantry, preserving order
pub fn annotate(
    recipes: &[Recipe],
    pantry: &NormalizedPantry,
    matcher: &IngredientMatcher,
) -> Vec<AnnotatedRecipe> {
    recipes
        .iter()
        .map(|recipe| AnnotatedRecipe::new(recipe.clone(), &matcher.match_recipe(recipe, pantry)))
        .collect()
}

/// Menu policy: drop recipes with no matches, stable sort by missing count
pub fn menu_order(annotated: Vec<AnnotatedRecipe>) -> Vec<AnnotatedRecipe> {
    let mut menu: Vec<AnnotatedRecipe> = annotated
        .into_iter()
        .filter(|r| r.matched_count > 0)
        .collect();
    menu.sort_by_key(|r| r.missing_count());
    menu
}

/// Case-insensitive name prefix search; a blank query keeps everything
pub fn search(annotated: Vec<AnnotatedRecipe>, query: &str) -> Vec<AnnotatedRecipe> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return annotated;
    }
    annotated
        .into_iter()
        .filter(|r| r.recipe.name.to_lowercase().starts_with(&query))
        .collect()
}

/// Full pipeline: pre-filter, aggregate, apply view policy, post-filter
pub fn build_view(
    recipes: &[Recipe],
    selector: &RecipeSelector,
    pantry: &NormalizedPantry,
    matcher: &IngredientMatcher,
    kind: ViewKind,
    query: &str,
) -> Vec<AnnotatedRecipe> {
    let selected: Vec<Recipe> = recipes
        .iter()
        .filter(|r| selector.accepts(r))
        .cloned()
        .collect();

    let annotated = annotate(&selected, pantry, matcher);
    let ordered = match kind {
        ViewKind::Menu => menu_order(annotated),
        ViewKind::Explore => annotated,
    };
    search(ordered, query)
}
