//! Edit-distance similarity between normalized ingredient names

use strsim::{levenshtein, normalized_levenshtein};

/// Levenshtein distance counted in characters, not bytes
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein(a, b)
}

/// Similarity score in `[0, 1]`: `1 - distance / max(len(a), len(b))`.
///
/// Both inputs must already be normalized and non-empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    normalized_levenshtein(a, b)
}
