//! Recipe data model
//!
//! Recipes are immutable snapshots of catalog records. The catalog serves
//! flat JSON objects (`strIngredient1` .. `strIngredient20`) which are folded
//! into an ordered list of ingredient slots here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::matching::normalize_name;

/// Maximum number of ingredient/measure pairs a catalog record carries
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// One `(ingredient, measure)` slot. The name may be blank for unused slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub measure: String,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measure: measure.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail: String::new(),
            area: None,
            category: None,
            instructions: None,
            ingredients: Vec::new(),
        }
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Append ingredient slots with empty measures
    pub fn with_ingredients<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients
            .extend(names.into_iter().map(|n| RecipeIngredient::new(n, "")));
        self
    }

    /// Normalized names of every non-blank slot, paired with the slot index
    pub fn normalized_ingredients(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        self.ingredients
            .iter()
            .enumerate()
            .map(|(idx, slot)| (idx, normalize_name(&slot.name)))
            .filter(|(_, name)| !name.is_empty())
    }

    /// Decode a catalog record. Returns `None` when the id or name is missing.
    ///
    /// Slot `n` of the record stays at index `n - 1`: null slots before the
    /// last populated one become blank, trailing null slots are dropped.
    /// Partial records (filter listings) only carry id, name and thumbnail and
    /// decode to a recipe without ingredient slots.
    pub fn from_meal_json(record: &Value) -> Option<Self> {
        let obj = record.as_object()?;
        let id = text_field(obj, "idMeal")?;
        let name = text_field(obj, "strMeal")?;

        let slots: Vec<(Option<String>, Option<String>)> = (1..=MAX_INGREDIENT_SLOTS)
            .map(|slot| {
                (
                    text_field(obj, &format!("strIngredient{slot}")),
                    text_field(obj, &format!("strMeasure{slot}")),
                )
            })
            .collect();
        let used = slots
            .iter()
            .rposition(|(ingredient, measure)| ingredient.is_some() || measure.is_some())
            .map_or(0, |last| last + 1);

        let ingredients = slots
            .into_iter()
            .take(used)
            .map(|(ingredient, measure)| RecipeIngredient {
                name: ingredient.unwrap_or_default(),
                measure: measure.unwrap_or_default(),
            })
            .collect();

        Some(Self {
            id,
            name,
            thumbnail: text_field(obj, "strMealThumb").unwrap_or_default(),
            area: text_field(obj, "strArea").filter(|s| !s.trim().is_empty()),
            category: text_field(obj, "strCategory").filter(|s| !s.trim().is_empty()),
            instructions: text_field(obj, "strInstructions"),
            ingredients,
        })
    }

    /// Encode back into the catalog's flat record shape for API compatibility
    pub fn to_meal_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("idMeal".into(), Value::String(self.id.clone()));
        obj.insert("strMeal".into(), Value::String(self.name.clone()));
        obj.insert("strMealThumb".into(), Value::String(self.thumbnail.clone()));
        obj.insert("strArea".into(), optional(&self.area));
        obj.insert("strCategory".into(), optional(&self.category));
        obj.insert("strInstructions".into(), optional(&self.instructions));

        for slot in 1..=MAX_INGREDIENT_SLOTS {
            let (name, measure) = match self.ingredients.get(slot - 1) {
                Some(ing) => (
                    Value::String(ing.name.clone()),
                    Value::String(ing.measure.clone()),
                ),
                None => (Value::Null, Value::Null),
            };
            obj.insert(format!("strIngredient{slot}"), name);
            obj.insert(format!("strMeasure{slot}"), measure);
        }

        Value::Object(obj)
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn optional(value: &Option<String>) -> Value {
    value
        .as_ref()
        .map(|s| Value::String(s.clone()))
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> Value {
        json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strMealThumb": "https://example.com/teriyaki.jpg",
            "strArea": "Japanese",
            "strCategory": "Chicken",
            "strInstructions": "Preheat oven.",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": "water",
            "strMeasure2": "1/2 cup",
            "strIngredient3": "",
            "strMeasure3": " ",
            "strIngredient4": null,
            "strMeasure4": null
        })
    }

    #[test]
    fn test_decode_meal_record() {
        let recipe = Recipe::from_meal_json(&sample_record()).expect("decodes");
        assert_eq!(recipe.id, "52772");
        assert_eq!(recipe.area.as_deref(), Some("Japanese"));
        // Blank slot 3 is kept, null slot 4 is dropped
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0], RecipeIngredient::new("soy sauce", "3/4 cup"));
    }

    #[test]
    fn test_blank_slots_are_skipped_for_matching() {
        let recipe = Recipe::from_meal_json(&sample_record()).unwrap();
        let names: Vec<_> = recipe.normalized_ingredients().map(|(_, n)| n).collect();
        assert_eq!(names, vec!["soy sauce", "water"]);
    }

    #[test]
    fn test_null_gap_keeps_slot_numbers() {
        let record = json!({
            "idMeal": "9",
            "strMeal": "Custard",
            "strIngredient1": "egg",
            "strIngredient2": null,
            "strMeasure2": null,
            "strIngredient3": "milk",
            "strMeasure3": "1 cup"
        });
        let recipe = Recipe::from_meal_json(&record).unwrap();
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[2], RecipeIngredient::new("milk", "1 cup"));

        let encoded = recipe.to_meal_json();
        assert_eq!(encoded["strIngredient1"], "egg");
        assert_eq!(encoded["strIngredient2"], "");
        assert_eq!(encoded["strIngredient3"], "milk");
        assert_eq!(encoded["strMeasure3"], "1 cup");
        assert_eq!(encoded["strIngredient4"], Value::Null);

        let slots: Vec<_> = recipe.normalized_ingredients().map(|(idx, _)| idx).collect();
        assert_eq!(slots, vec![0, 2]);
    }

    #[test]
    fn test_partial_listing_record() {
        let record = json!({"idMeal": "1", "strMeal": "Pad Thai", "strMealThumb": "x.jpg"});
        let recipe = Recipe::from_meal_json(&record).unwrap();
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.area.is_none());
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(Recipe::from_meal_json(&json!({"strMeal": "Nameless"})).is_none());
        assert!(Recipe::from_meal_json(&json!("not an object")).is_none());
    }

    #[test]
    fn test_encode_keeps_catalog_field_names() {
        let recipe = Recipe::from_meal_json(&sample_record()).unwrap();
        let encoded = recipe.to_meal_json();
        assert_eq!(encoded["strMeal"], "Teriyaki Chicken Casserole");
        assert_eq!(encoded["strIngredient2"], "water");
        assert_eq!(encoded["strIngredient20"], Value::Null);
    }
}
