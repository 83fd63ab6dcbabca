//! Match decision and per-recipe aggregation

use serde::Serialize;

use super::normalize::normalize_name;
use super::similarity::similarity;
use crate::recipe::Recipe;

/// Similarity a pantry name must exceed for an ingredient to count as available
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Pantry names in comparison form: normalized, non-empty, de-duplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPantry {
    names: Vec<String>,
}

impl NormalizedPantry {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for name in names {
            let name = normalize_name(name.as_ref());
            if !name.is_empty() && !normalized.contains(&name) {
                normalized.push(name);
            }
        }
        Self { names: normalized }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Availability of one non-blank recipe slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotMatch {
    /// Index into `Recipe::ingredients`
    pub slot: usize,
    pub name: String,
    pub available: bool,
}

/// Match statistics for one recipe against one pantry snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchResult {
    pub slots: Vec<SlotMatch>,
    pub matched_count: usize,
    pub total_count: usize,
}

impl MatchResult {
    pub fn missing_count(&self) -> usize {
        self.total_count - self.matched_count
    }
}

/// Fuzzy ingredient matcher with a configurable threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientMatcher {
    threshold: f64,
}

impl Default for IngredientMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl IngredientMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether two already-normalized, non-empty names are close enough
    pub fn is_match(&self, a: &str, b: &str) -> bool {
        similarity(a, b) > self.threshold
    }

    /// Whether `ingredient` is available in the pantry.
    ///
    /// The first pantry name above the threshold wins; blank ingredients are never available.
    pub fn is_available(&self, ingredient: &str, pantry: &NormalizedPantry) -> bool {
        let ingredient = normalize_name(ingredient);
        if ingredient.is_empty() {
            return false;
        }
        pantry
            .names()
            .iter()
            .any(|name| self.is_match(&ingredient, name))
    }

    /// Closest pantry name and its score, even when below the threshold
    pub fn best_match<'p>(
        &self,
        ingredient: &str,
        pantry: &'p NormalizedPantry,
    ) -> Option<(&'p str, f64)> {
        let ingredient = normalize_name(ingredient);
        if ingredient.is_empty() {
            return None;
        }
        pantry
            .names()
            .iter()
            .map(|name| (name.as_str(), similarity(&ingredient, name)))
            .fold(None, |best: Option<(&str, f64)>, candidate| match best {
                Some(b) if b.1 >= candidate.1 => Some(b),
                _ => Some(candidate),
            })
    }

    /// Aggregate a recipe's non-blank slots against the pantry
    pub fn match_recipe(&self, recipe: &Recipe, pantry: &NormalizedPantry) -> MatchResult {
        let slots: Vec<SlotMatch> = recipe
            .normalized_ingredients()
            .map(|(slot, name)| {
                let available = pantry.names().iter().any(|p| self.is_match(&name, p));
                SlotMatch {
                    slot,
                    name,
                    available,
                }
            })
            .collect();

        let matched_count = slots.iter().filter(|s| s.available).count();
        MatchResult {
            total_count: slots.len(),
            matched_count,
            slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pantry(names: &[&str]) -> NormalizedPantry {
        NormalizedPantry::from_names(names)
    }

    #[test]
    fn test_pantry_normalizes_and_dedupes() {
        let p = pantry(&["Egg", "egg.", "  ", "Flour"]);
        assert_eq!(p.names(), &["egg".to_string(), "flour".to_string()]);
    }

    #[test]
    fn test_typo_is_available() {
        let matcher = IngredientMatcher::default();
        assert!(matcher.is_available("tomatoe", &pantry(&["tomato"])));
    }

    #[test]
    fn test_unrelated_is_not_available() {
        let matcher = IngredientMatcher::default();
        assert!(!matcher.is_available("chicken", &pantry(&["beef"])));
    }

    #[test]
    fn test_threshold_is_strict() {
        // "eggs" vs "egg" scores exactly 0.75
        assert!(IngredientMatcher::new(0.7).is_available("eggs", &pantry(&["egg"])));
        assert!(!IngredientMatcher::new(0.75).is_available("eggs", &pantry(&["egg"])));
    }

    #[test]
    fn test_empty_pantry_matches_nothing() {
        let matcher = IngredientMatcher::default();
        assert!(!matcher.is_available("egg", &NormalizedPantry::default()));
    }

    #[test]
    fn test_blank_ingredient_is_never_available() {
        let matcher = IngredientMatcher::default();
        assert!(!matcher.is_available(" . ", &pantry(&["egg"])));
    }

    #[test]
    fn test_match_recipe_counts() {
        let recipe = Recipe::new("1", "Pancakes").with_ingredients(["Egg", "Milk", "Flour", ""]);
        let result = IngredientMatcher::default().match_recipe(&recipe, &pantry(&["egg", "flour"]));

        assert_eq!(result.matched_count, 2);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.missing_count(), 1);
        assert!(!result.slots[1].available);
        assert_eq!(result.slots[1].slot, 1);
    }

    #[test]
    fn test_recipe_without_slots() {
        let recipe = Recipe::new("2", "Mystery");
        let result = IngredientMatcher::default().match_recipe(&recipe, &pantry(&["egg"]));
        assert_eq!(result.total_count, 0);
        assert_eq!(result.matched_count, 0);
    }

    #[test]
    fn test_best_match_reports_closest() {
        let p = pantry(&["beef", "tomato", "potato"]);
        let (name, score) = IngredientMatcher::default().best_match("tomatoes", &p).unwrap();
        assert_eq!(name, "tomato");
        assert!(score > 0.7);
    }
}
