//! Query and field normalization.
//!
//! Every string that takes part in matching goes through [`normalize`] first, so
//! "Beyoncé", "BEYONCE" and "beyonce" all compare equal.

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block stripped after canonical decomposition.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Vowels removed when building a consonant skeleton.
const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Minimum number of characters a query token needs to become a term.
const MIN_TERM_CHARS: usize = 2;

/// A normalized search token.
pub type Term = String;

/// Lowercases `text`, decomposes it (NFD) and strips combining diacritical marks.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .collect()
}

/// Splits a raw query into normalized terms, in order of occurrence.
///
/// Tokens of a single character are dropped. Duplicates are kept.
pub fn normalize_search_terms(query: &str) -> Vec<Term> {
    normalize(query)
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TERM_CHARS)
        .map(str::to_string)
        .collect()
}

/// Removes the lowercase vowels from `text`.
pub fn strip_vowels(text: &str) -> String {
    text.chars().filter(|c| !VOWELS.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("Beyoncé", "beyonce")]
    #[case("SIGUR RÓS", "sigur ros")]
    #[case("Mötley Crüe", "motley crue")]
    #[case("naïve", "naive")]
    #[case("plain", "plain")]
    fn test_normalize_strips_diacritics(#[case] input: &str, #[case] expected: &str) {
        check!(normalize(input) == expected);
    }

    #[test]
    fn test_normalize_keeps_non_latin_base_letters() {
        check!(normalize("Москва") == "москва");
    }

    #[rstest]
    #[case("Sad   Song", vec!["sad", "song"])]
    #[case("a sad song", vec!["sad", "song"])]
    #[case("Café del Mar", vec!["cafe", "del", "mar"])]
    #[case("echo echo", vec!["echo", "echo"])]
    fn test_normalize_search_terms(#[case] input: &str, #[case] expected: Vec<&str>) {
        check!(normalize_search_terms(input) == expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("a b c")]
    fn test_normalize_search_terms_empty(#[case] input: &str) {
        check!(normalize_search_terms(input).is_empty());
    }

    #[test]
    fn test_strip_vowels() {
        check!(strip_vowels("billie") == "bll");
        check!(strip_vowels("aeiou").is_empty());
    }
}
