//! Ingredient Name Normalization
//!
//! Cleans typed or transcribed ingredient names into the form used for comparison.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Trailing sentence punctuation, plus any whitespace mixed into it ("egg . ")
    static ref TRAILING_PUNCTUATION: Regex = Regex::new(r"[\s.,!?]+$").unwrap();
}

/// Trim whitespace and strip trailing `. , ! ?` runs, keeping the original case.
///
/// Used where the catalog's own spelling must be looked up afterwards.
pub fn clean_name(raw: &str) -> String {
    TRAILING_PUNCTUATION
        .replace(raw.trim(), "")
        .trim()
        .to_string()
}

/// Canonical comparison form of an ingredient name.
///
/// An empty result means "no ingredient" and must never reach the similarity metric.
pub fn normalize_name(raw: &str) -> String {
    clean_name(raw).to_lowercase()
}
