//! # Name Normalization
//!
//! Produces the comparison key used by both the index builder and the
//! resolver. Two names match only when their normalized forms are equal.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Turns a display name into a comparison key.
///
/// Implementations must be deterministic: the same normalizer has to be used
/// to build an index and to query it.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, name: &str) -> String;
}

/// Default normalizer.
///
/// 1. NFD decomposition, combining marks dropped (`é` -> `e`)
/// 2. Lowercase
/// 3. Punctuation and symbols dropped (`McDonald's` -> `mcdonalds`)
/// 4. Whitespace runs collapsed to a single space, trimmed
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleNormalizer;

impl Normalizer for SimpleNormalizer {
    fn normalize(&self, name: &str) -> String {
        simplify(name)
    }
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, name: &str) -> String {
        self(name)
    }
}

/// Normalize a name with the default rules.
pub fn simplify(name: &str) -> String {
    let folded: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_case() {
        assert_eq!(simplify("Café Müller"), "cafe muller");
        assert_eq!(simplify("ÉCOLE"), "ecole");
    }

    #[test]
    fn drops_punctuation_without_splitting_words() {
        assert_eq!(simplify("McDonald's"), "mcdonalds");
        assert_eq!(simplify("7-Eleven"), "7eleven");
        assert_eq!(simplify("Dunkin' Donuts!"), "dunkin donuts");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(simplify("  Burger \t  King \n"), "burger king");
        assert_eq!(simplify("   "), "");
    }

    #[test]
    fn closures_are_normalizers() {
        let upper = |s: &str| s.to_uppercase();
        assert_eq!(upper.normalize("acme"), "ACME");
        assert_eq!(SimpleNormalizer.normalize("ACME"), "acme");
    }
}
