//! Recipe Catalog Source
//!
//! Read-only access to the third-party recipe catalog. Network failures are
//! logged by the implementation and surface as empty results, never errors.

pub mod mealdb;

use async_trait::async_trait;
use std::collections::HashSet;
use std::str::FromStr;

use crate::config::Config;
use crate::matching::RecipeSelector;
use crate::recipe::Recipe;

pub use mealdb::MealDbClient;

#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// Full recipes whose name starts with `letter`
    async fn list_by_letter(&self, letter: char) -> Vec<Recipe>;

    /// Partial recipes (id, name, thumbnail) in a dish category
    async fn list_by_category(&self, category: &str) -> Vec<Recipe>;

    /// Partial recipes from a cuisine area
    async fn list_by_area(&self, area: &str) -> Vec<Recipe>;

    /// Partial recipes that use a main ingredient
    async fn list_by_ingredient(&self, ingredient: &str) -> Vec<Recipe>;

    async fn get_by_id(&self, id: &str) -> Option<Recipe>;

    /// Every ingredient name the catalog knows, in catalog spelling
    async fn list_all_ingredient_names(&self) -> Vec<String>;
}

/// Fetch the whole catalog, letter by letter, in `a..=z` order
pub async fn fetch_all(catalog: &dyn RecipeCatalog) -> Vec<Recipe> {
    let pages = futures::future::join_all(('a'..='z').map(|c| catalog.list_by_letter(c))).await;
    pages.into_iter().flatten().collect()
}

/// Category chips offered by the browse screens
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Areas listed in `Config::western_areas`
    Western,
    /// Union of the categories in `Config::healthy_categories`
    Healthy,
    Area(String),
    Category(String),
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    /// `all`, `western`, `healthy`, `category:<name>`, anything else is an area
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        Ok(match lower.as_str() {
            "" | "all" => Self::All,
            "western" => Self::Western,
            "healthy" => Self::Healthy,
            _ => match lower.strip_prefix("category:") {
                Some(_) => Self::Category(trimmed["category:".len()..].trim().to_string()),
                None => match lower.strip_prefix("area:") {
                    Some(_) => Self::Area(trimmed["area:".len()..].trim().to_string()),
                    None => Self::Area(trimmed.to_string()),
                },
            },
        })
    }
}

impl CategoryFilter {
    /// Turn the chip into a pre-filter, querying the catalog where a listing is needed
    pub async fn resolve(&self, catalog: &dyn RecipeCatalog, config: &Config) -> RecipeSelector {
        match self {
            Self::All => RecipeSelector::All,
            Self::Western => RecipeSelector::areas(&config.western_areas),
            Self::Area(area) => RecipeSelector::areas([area]),
            Self::Category(category) => RecipeSelector::Category(category.to_lowercase()),
            Self::Healthy => {
                let listings = futures::future::join_all(
                    config
                        .healthy_categories
                        .iter()
                        .map(|c| catalog.list_by_category(c)),
                )
                .await;
                let ids: HashSet<String> = listings.into_iter().flatten().map(|r| r.id).collect();
                RecipeSelector::Ids(ids)
            }
        }
    }
}
