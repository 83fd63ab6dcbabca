//! Mock Recipe Catalog for Testing
//!
//! Serves an in-memory recipe list through the catalog trait.

use async_trait::async_trait;
use larder::catalog::RecipeCatalog;
use larder::recipe::Recipe;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Catalog backed by a fixed recipe list
pub struct MockCatalog {
    pub recipes: Vec<Recipe>,
    pub ingredient_names: Vec<String>,
    /// Number of `list_by_letter` calls, to check caching
    pub letter_calls: AtomicUsize,
}

impl MockCatalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let mut ingredient_names: Vec<String> = recipes
            .iter()
            .flat_map(|r| r.ingredients.iter().map(|i| i.name.clone()))
            .collect();
        ingredient_names.sort();
        ingredient_names.dedup();
        Self {
            recipes,
            ingredient_names,
            letter_calls: AtomicUsize::new(0),
        }
    }

    /// Catalog that knows nothing, like an unreachable upstream
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn partial(recipe: &Recipe) -> Recipe {
        let mut partial = Recipe::new(recipe.id.clone(), recipe.name.clone());
        partial.thumbnail = recipe.thumbnail.clone();
        partial
    }
}

#[async_trait]
impl RecipeCatalog for MockCatalog {
    async fn list_by_letter(&self, letter: char) -> Vec<Recipe> {
        self.letter_calls.fetch_add(1, Ordering::SeqCst);
        let letter = letter.to_ascii_lowercase();
        self.recipes
            .iter()
            .filter(|r| r.name.to_lowercase().starts_with(letter))
            .cloned()
            .collect()
    }

    async fn list_by_category(&self, category: &str) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|r| {
                r.category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category))
            })
            .map(Self::partial)
            .collect()
    }

    async fn list_by_area(&self, area: &str) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.area.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(area)))
            .map(Self::partial)
            .collect()
    }

    async fn list_by_ingredient(&self, ingredient: &str) -> Vec<Recipe> {
        let wanted = ingredient.to_lowercase().replace('_', " ");
        self.recipes
            .iter()
            .filter(|r| r.ingredients.iter().any(|i| i.name.to_lowercase() == wanted))
            .map(Self::partial)
            .collect()
    }

    async fn get_by_id(&self, id: &str) -> Option<Recipe> {
        self.recipes.iter().find(|r| r.id == id).cloned()
    }

    async fn list_all_ingredient_names(&self) -> Vec<String> {
        self.ingredient_names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_catalog_lists_by_letter() {
        let mock = MockCatalog::new(vec![
            Recipe::new("1", "Apple Pie"),
            Recipe::new("2", "Banana Bread"),
        ]);
        let recipes = mock.list_by_letter('A').await;
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, "1");
        assert_eq!(mock.letter_calls.load(Ordering::SeqCst), 1);
    }
}
