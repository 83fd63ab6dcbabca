//! Recipe Browser
//!
//! Caller-side assembly of the menu, explore and meal-detail views. The
//! pantry is injected as a [`PantryProvider`] and read fresh for every view,
//! so there is no match state to invalidate when the pantry changes.

use serde::Serialize;

use crate::matching::{
    build_view, AnnotatedRecipe, IngredientMatcher, NormalizedPantry, RecipeSelector, ViewKind,
};
use crate::pantry::PantryProvider;
use crate::recipe::Recipe;

/// One ingredient line on the meal detail screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailLine {
    pub name: String,
    pub measure: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealDetail {
    pub recipe: Recipe,
    pub lines: Vec<DetailLine>,
    pub matched_count: usize,
    pub total_count: usize,
}

impl MealDetail {
    pub fn missing(&self) -> impl Iterator<Item = &DetailLine> {
        self.lines.iter().filter(|l| !l.available)
    }
}

pub struct RecipeBrowser<P: PantryProvider> {
    /// Catalog order, used as the tie-break when ranking
    recipes: Vec<Recipe>,
    pantry: P,
    matcher: IngredientMatcher,
}

impl<P: PantryProvider> RecipeBrowser<P> {
    pub fn new(recipes: Vec<Recipe>, pantry: P, matcher: IngredientMatcher) -> Self {
        Self {
            recipes,
            pantry,
            matcher,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn set_recipes(&mut self, recipes: Vec<Recipe>) {
        self.recipes = recipes;
    }

    pub fn pantry(&self) -> &P {
        &self.pantry
    }

    pub fn pantry_mut(&mut self) -> &mut P {
        &mut self.pantry
    }

    fn snapshot(&self) -> NormalizedPantry {
        NormalizedPantry::from_names(self.pantry.snapshot())
    }

    /// Recipes with at least one available ingredient, fewest missing first
    pub fn menu(&self, selector: &RecipeSelector, query: &str) -> Vec<AnnotatedRecipe> {
        self.view(ViewKind::Menu, selector, query)
    }

    /// Every recipe in catalog order, annotated
    pub fn explore(&self, selector: &RecipeSelector, query: &str) -> Vec<AnnotatedRecipe> {
        self.view(ViewKind::Explore, selector, query)
    }

    pub fn view(
        &self,
        kind: ViewKind,
        selector: &RecipeSelector,
        query: &str,
    ) -> Vec<AnnotatedRecipe> {
        build_view(
            &self.recipes,
            selector,
            &self.snapshot(),
            &self.matcher,
            kind,
            query,
        )
    }

    /// Per-ingredient availability for one recipe in the collection
    pub fn detail(&self, id: &str) -> Option<MealDetail> {
        let recipe = self.recipes.iter().find(|r| r.id == id)?;
        Some(detail_for(recipe, &self.snapshot(), &self.matcher))
    }
}

/// Build the detail view for any recipe, e.g. one fetched by id
pub fn detail_for(
    recipe: &Recipe,
    pantry: &NormalizedPantry,
    matcher: &IngredientMatcher,
) -> MealDetail {
    let result = matcher.match_recipe(recipe, pantry);
    let lines = result
        .slots
        .iter()
        .map(|slot| {
            let ingredient = &recipe.ingredients[slot.slot];
            DetailLine {
                name: ingredient.name.trim().to_string(),
                measure: ingredient.measure.trim().to_string(),
                available: slot.available,
            }
        })
        .collect();

    MealDetail {
        recipe: recipe.clone(),
        lines,
        matched_count: result.matched_count,
        total_count: result.total_count,
    }
}
