//! Ingredient Matcher
//!
//! Decides which recipe ingredients the user already has, using edit-distance
//! similarity between normalized names, and ranks recipes by what is missing.
//! Everything here is pure: no I/O, no shared state between calls.

pub mod matcher;
pub mod normalize;
pub mod ranking;
pub mod similarity;

pub use matcher::{IngredientMatcher, MatchResult, NormalizedPantry, SlotMatch, DEFAULT_THRESHOLD};
pub use normalize::{clean_name, normalize_name};
pub use ranking::{
    annotate, build_view, menu_order, search, AnnotatedRecipe, RecipeSelector, ViewKind,
};
pub use similarity::{edit_distance, similarity};
