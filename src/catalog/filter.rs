//! Retrieval predicates understood by catalog stores.
//!
//! A [`Filter`] is a disjunction: a record is returned when ANY of its criteria
//! matches. Substring and phonetic matching compare [`normalize`]d field text,
//! so they ignore case and diacritics. [`TextMatch::Equals`] ignores case only.

use super::StoreError;
use crate::search::normalize::normalize;
use crate::search::phonetic::PhoneticCodes;
use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};

/// Searchable fields of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackField {
    Title,
    Lyrics,
}

/// Searchable fields of an artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtistField {
    Name,
    Genre,
}

/// Searchable fields of an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlbumField {
    Title,
    Genre,
}

/// How a field's text is tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMatch {
    /// The whole field equals the text, ignoring case.
    Equals(String),
    /// The field contains the text.
    Contains(String),
    /// The field contains every text, in any order. Matches nothing when empty.
    ContainsAll(Vec<String>),
    /// One of the field's words has one of these phonetic codes.
    SoundsLike(Vec<String>),
}

/// A single field test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion<F> {
    pub field: F,
    pub matcher: TextMatch,
}

/// Any-of list of criteria. An empty filter matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter<F> {
    criteria: Vec<Criterion<F>>,
}

pub type TrackFilter = Filter<TrackField>;
pub type ArtistFilter = Filter<ArtistField>;
pub type AlbumFilter = Filter<AlbumField>;

impl<F> Default for Filter<F> {
    fn default() -> Self {
        Self {
            criteria: Vec::new(),
        }
    }
}

impl<F: Copy> Filter<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a criterion, skipping ones that could never match.
    pub fn or(mut self, field: F, matcher: TextMatch) -> Self {
        let satisfiable = match &matcher {
            TextMatch::Equals(text) | TextMatch::Contains(text) => !text.is_empty(),
            TextMatch::ContainsAll(texts) | TextMatch::SoundsLike(texts) => !texts.is_empty(),
        };
        if satisfiable {
            self.criteria.push(Criterion { field, matcher });
        }
        self
    }

    pub fn criteria(&self) -> &[Criterion<F>] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Compiles every criterion into a matcher over normalized text.
    pub fn compile(&self) -> Result<CompiledFilter<F>, StoreError> {
        let criteria = self
            .criteria
            .iter()
            .map(|criterion| Ok((criterion.field, CompiledMatch::compile(&criterion.matcher)?)))
            .collect::<Result<Vec<_>, StoreError>>()?;
        Ok(CompiledFilter { criteria })
    }
}

/// A [`Filter`] ready to be evaluated against records.
#[derive(Debug)]
pub struct CompiledFilter<F> {
    criteria: Vec<(F, CompiledMatch)>,
}

impl<F: Copy> CompiledFilter<F> {
    /// Whether a record matches, given a lookup from field to its searchable text.
    pub fn matches<'a>(&self, field: impl Fn(F) -> &'a FieldText) -> bool {
        self.criteria
            .iter()
            .any(|(name, matcher)| matcher.is_match(field(*name)))
    }
}

/// Normalized field text with lazily computed per-word phonetic codes.
#[derive(Debug, Default)]
pub struct FieldText {
    text: String,
    lowercase: String,
    codes: std::sync::OnceLock<Vec<PhoneticCodes>>,
}

impl FieldText {
    pub fn new(raw: &str) -> Self {
        Self {
            text: normalize(raw),
            lowercase: raw.to_lowercase(),
            codes: std::sync::OnceLock::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The raw text, lowercased but otherwise untouched.
    pub fn as_lowercase(&self) -> &str {
        &self.lowercase
    }

    /// Phonetic codes of each word, computed on first use.
    pub fn word_codes(&self) -> &[PhoneticCodes] {
        self.codes.get_or_init(|| {
            self.text
                .split_whitespace()
                .map(crate::search::phonetic::encode)
                .filter(|codes| !codes.is_empty())
                .collect()
        })
    }
}

#[derive(Debug)]
enum CompiledMatch {
    Equals(String),
    Contains(Regex),
    ContainsAll(RegexSet),
    SoundsLike(Vec<String>),
}

impl CompiledMatch {
    fn compile(matcher: &TextMatch) -> Result<Self, StoreError> {
        Ok(match matcher {
            TextMatch::Equals(text) => Self::Equals(text.to_lowercase()),
            TextMatch::Contains(text) => Self::Contains(
                RegexBuilder::new(&regex::escape(&normalize(text)))
                    .case_insensitive(true)
                    .build()?,
            ),
            TextMatch::ContainsAll(texts) => Self::ContainsAll(
                RegexSetBuilder::new(texts.iter().map(|text| regex::escape(&normalize(text))))
                    .case_insensitive(true)
                    .build()?,
            ),
            TextMatch::SoundsLike(codes) => Self::SoundsLike(codes.clone()),
        })
    }

    fn is_match(&self, field: &FieldText) -> bool {
        match self {
            Self::Equals(text) => field.as_lowercase() == text,
            Self::Contains(pattern) => pattern.is_match(field.as_str()),
            Self::ContainsAll(patterns) => {
                !patterns.is_empty() && patterns.matches(field.as_str()).matched_all()
            }
            Self::SoundsLike(codes) => field
                .word_codes()
                .iter()
                .any(|word| codes.iter().any(|code| word.contains(code))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn matches(filter: &ArtistFilter, name: &str) -> bool {
        let name = FieldText::new(name);
        let genre = FieldText::new("");
        filter.compile().unwrap().matches(|field| match field {
            ArtistField::Name => &name,
            ArtistField::Genre => &genre,
        })
    }

    #[rstest]
    #[case(TextMatch::Equals("billie eilish".into()), "Billie Eilish", true)]
    #[case(TextMatch::Equals("billie".into()), "Billie Eilish", false)]
    #[case(TextMatch::Equals("SIGUR RÓS".into()), "Sigur Rós", true)]
    #[case(TextMatch::Equals("sigur ros".into()), "Sigur Rós", false)]
    #[case(TextMatch::Equals("billie eilish ".into()), "Billie Eilish", false)]
    #[case(TextMatch::Contains("EILISH".into()), "Billie Eilish", true)]
    #[case(TextMatch::Contains("beyonce".into()), "Beyoncé", true)]
    #[case(TextMatch::Contains("a.b".into()), "axb", false)]
    #[case(TextMatch::ContainsAll(vec!["eilish".into(), "bil".into()]), "Billie Eilish", true)]
    #[case(TextMatch::ContainsAll(vec!["eilish".into(), "bob".into()]), "Billie Eilish", false)]
    #[case(TextMatch::SoundsLike(vec!["PL".into()]), "Billie Eilish", true)]
    #[case(TextMatch::SoundsLike(vec!["XMT".into()]), "Patti Smith", true)]
    #[case(TextMatch::SoundsLike(vec!["KK".into()]), "Billie Eilish", false)]
    fn test_single_criterion(#[case] matcher: TextMatch, #[case] name: &str, #[case] expected: bool) {
        let filter = ArtistFilter::new().or(ArtistField::Name, matcher);
        check!(matches(&filter, name) == expected);
    }

    #[test]
    fn test_empty_filter_matches_nothing() {
        let filter = ArtistFilter::new()
            .or(ArtistField::Name, TextMatch::ContainsAll(vec![]))
            .or(ArtistField::Name, TextMatch::Contains(String::new()))
            .or(ArtistField::Name, TextMatch::SoundsLike(vec![]));
        check!(filter.is_empty());
        check!(!matches(&filter, "anything"));
    }

    #[test]
    fn test_any_criterion_is_enough() {
        let filter = ArtistFilter::new()
            .or(ArtistField::Genre, TextMatch::Contains("jazz".into()))
            .or(ArtistField::Name, TextMatch::Contains("muse".into()));
        check!(filter.criteria().len() == 2);
        check!(matches(&filter, "Muse"));
    }

    #[test]
    fn test_word_codes_are_memoized_per_word() {
        let field = FieldText::new("Patti Smith");
        check!(field.word_codes().len() == 2);
        check!(std::ptr::eq(field.word_codes(), field.word_codes()));
    }
}
