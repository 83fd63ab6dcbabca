//! Pantry Store
//!
//! The user's set of available ingredients. Names are validated against the
//! catalog's ingredient list when added, and are unique case-insensitively.
//! Matching never reads the pantry directly: it takes a snapshot through
//! [`PantryProvider`].

pub mod store;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LarderError, LarderResult};
use crate::matching::{clean_name, normalize_name};

pub use store::{Submission, SubmissionStore, SubmittedIngredient};

/// Supplies the current pantry names to whoever performs aggregation
pub trait PantryProvider {
    fn snapshot(&self) -> Vec<String>;
}

impl PantryProvider for Vec<String> {
    fn snapshot(&self) -> Vec<String> {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryIngredient {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl PantryIngredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
        }
    }
}

/// Ordered, case-insensitively unique set of pantry ingredients
#[derive(Debug, Clone, Default)]
pub struct Pantry {
    items: Vec<PantryIngredient>,
    /// Catalog ingredient names, catalog spelling
    known: Vec<String>,
    image_base_url: String,
}

impl Pantry {
    pub fn new(known: Vec<String>, image_base_url: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            known,
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn get_all(&self) -> &[PantryIngredient] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let wanted = normalize_name(name);
        self.items.iter().any(|i| normalize_name(&i.name) == wanted)
    }

    /// Add a catalog ingredient by (typed or transcribed) name.
    ///
    /// Returns `Ok(false)` when it is already present.
    pub fn add(&mut self, raw: &str) -> LarderResult<bool> {
        let cleaned = clean_name(raw);
        if cleaned.is_empty() {
            return Err(LarderError::Validation(
                "Ingredient name is empty.".to_string(),
            ));
        }

        let wanted = cleaned.to_lowercase();
        let canonical = self
            .known
            .iter()
            .find(|k| k.to_lowercase() == wanted)
            .cloned()
            .ok_or_else(|| {
                LarderError::Validation(format!(
                    "'{cleaned}' is not a recognized ingredient. Please select from the suggestion list."
                ))
            })?;

        if self.contains(&canonical) {
            debug!("Pantry already has {}", canonical);
            return Ok(false);
        }

        let image = self.image_url(&canonical);
        self.items.push(PantryIngredient {
            name: canonical,
            image: Some(image),
        });
        Ok(true)
    }

    /// Remove by case-insensitive name; returns whether anything was removed
    pub fn remove(&mut self, name: &str) -> bool {
        let wanted = normalize_name(name);
        let before = self.items.len();
        self.items.retain(|i| normalize_name(&i.name) != wanted);
        self.items.len() != before
    }

    /// Replace the whole set (e.g. restoring the latest submission), dropping duplicates
    pub fn replace_all(&mut self, items: Vec<PantryIngredient>) {
        self.items.clear();
        for mut item in items {
            if normalize_name(&item.name).is_empty() || self.contains(&item.name) {
                continue;
            }
            if item.image.is_none() {
                item.image = Some(self.image_url(&item.name));
            }
            self.items.push(item);
        }
    }

    /// Catalog names starting with the typed prefix, for autocomplete
    pub fn suggest(&self, prefix: &str) -> Vec<&str> {
        let prefix = normalize_name(prefix);
        if prefix.is_empty() {
            return vec![];
        }
        self.known
            .iter()
            .filter(|k| k.to_lowercase().starts_with(&prefix))
            .map(|k| k.as_str())
            .collect()
    }

    fn image_url(&self, name: &str) -> String {
        format!("{}/{}.png", self.image_base_url, urlencoding::encode(name))
    }
}

impl PantryProvider for Pantry {
    fn snapshot(&self) -> Vec<String> {
        self.items.iter().map(|i| i.name.clone()).collect()
    }
}
