//! Relevance scoring of retrieved candidates.
//!
//! Each kind has its own additive scorer. For every query term and every one
//! of its variations, each matching signal adds its weight from [`WEIGHTS`].
//! Duplicated variations are scored again on purpose. Fields are compared in
//! normalized form; a missing relation reads as an empty field and never
//! contributes.

use super::normalize::{Term, normalize, strip_vowels};
use super::phonetic::encode;
use super::variations::{AliasTable, variations};
use crate::catalog::{AlbumEntity, Artist, TrackEntity};
use rapidfuzz::distance::levenshtein;

/// Signal weights shared by every scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    /// Normalized field equals the variant.
    pub exact: u32,
    /// Field starts with the variant.
    pub prefix: u32,
    /// Field contains the variant.
    pub contains: u32,
    /// Phonetic match at distance 0; each edit costs `phonetic_step`.
    pub phonetic: u32,
    pub phonetic_step: u32,
    /// Largest code distance that still scores.
    pub max_phonetic_distance: usize,
    /// Vowel-stripped field contains the vowel-stripped variant.
    pub skeleton: u32,
    pub genre: u32,
    pub lyrics: u32,
    /// Score of a track whose title is the whole query.
    pub title_is_query: u32,
}

pub const WEIGHTS: Weights = Weights {
    exact: 100,
    prefix: 90,
    contains: 70,
    phonetic: 80,
    phonetic_step: 20,
    max_phonetic_distance: 2,
    skeleton: 60,
    genre: 20,
    lyrics: 20,
    title_is_query: 100,
};

/// A variation with its derived match keys.
///
/// Phonetic-code variations carry no text and only take part in the
/// phonetic signal.
#[derive(Debug, Clone)]
struct Variant {
    text: Option<String>,
    code: String,
    skeleton: String,
}

impl Variant {
    fn text(variation: &str) -> Self {
        let text = normalize(variation);
        let code = encode(&text).primary().to_string();
        let skeleton = strip_vowels(&text);
        Self {
            text: Some(text),
            code,
            skeleton,
        }
    }

    fn code(code: &str) -> Self {
        Self {
            text: None,
            code: code.to_string(),
            skeleton: String::new(),
        }
    }
}

/// A normalized field with the primary phonetic code of each of its words.
struct Field {
    text: String,
    word_codes: Vec<String>,
    skeleton: String,
}

impl Field {
    fn new(raw: &str) -> Self {
        let text = normalize(raw);
        let word_codes = text
            .split_whitespace()
            .map(|word| encode(word).primary().to_string())
            .filter(|code| !code.is_empty())
            .collect();
        let skeleton = strip_vowels(&text);
        Self {
            text,
            word_codes,
            skeleton,
        }
    }

    fn equals(&self, variant: &Variant) -> bool {
        variant.text.as_deref() == Some(self.text.as_str())
    }

    fn starts_with(&self, variant: &Variant) -> bool {
        variant
            .text
            .as_deref()
            .is_some_and(|text| !self.text.is_empty() && self.text.starts_with(text))
    }

    fn contains(&self, variant: &Variant) -> bool {
        variant
            .text
            .as_deref()
            .is_some_and(|text| !self.text.is_empty() && self.text.contains(text))
    }

    /// `phonetic - step * d` for the closest word code within the maximum distance.
    fn phonetic(&self, variant: &Variant) -> u32 {
        if variant.code.is_empty() {
            return 0;
        }
        self.word_codes
            .iter()
            .map(|code| levenshtein::distance(code.chars(), variant.code.chars()))
            .min()
            .filter(|&distance| distance <= WEIGHTS.max_phonetic_distance)
            .and_then(|distance| u32::try_from(distance).ok())
            .map_or(0, |distance| WEIGHTS.phonetic - WEIGHTS.phonetic_step * distance)
    }

    fn skeleton_contains(&self, variant: &Variant) -> bool {
        !self.skeleton.is_empty()
            && !variant.skeleton.is_empty()
            && self.skeleton.contains(&variant.skeleton)
    }
}

const fn weight_if(matched: bool, weight: u32) -> u32 {
    if matched { weight } else { 0 }
}

/// Per-search scoring state: the query and every term's variations.
#[derive(Debug, Clone)]
pub struct Scorer {
    /// The query as typed, lowercased.
    query: String,
    terms: Vec<Vec<Variant>>,
}

impl Scorer {
    pub fn new(query: &str, terms: &[Term], aliases: &AliasTable) -> Self {
        let terms = terms
            .iter()
            .map(|term| {
                let codes = encode(term);
                variations(term, aliases)
                    .iter()
                    .map(|variation| {
                        if codes.iter().any(|code| code == variation.as_str()) {
                            Variant::code(variation)
                        } else {
                            Variant::text(variation)
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            query: query.to_lowercase(),
            terms,
        }
    }

    fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.terms.iter().flatten()
    }

    fn accumulate(&self, signals: impl Fn(&Variant) -> u32) -> u32 {
        self.variants().map(signals).sum()
    }

    pub fn score_track(&self, track: &TrackEntity) -> u32 {
        if track.track.title.to_lowercase() == self.query {
            return WEIGHTS.title_is_query;
        }
        let title = Field::new(&track.track.title);
        let artist = Field::new(track.artist_name());
        let album = Field::new(track.album_title());

        self.accumulate(|variant| {
            weight_if(title.equals(variant), WEIGHTS.exact)
                + weight_if(title.contains(variant), WEIGHTS.contains)
                + artist.phonetic(variant)
                + weight_if(artist.skeleton_contains(variant), WEIGHTS.skeleton)
                + weight_if(album.skeleton_contains(variant), WEIGHTS.skeleton)
        })
    }

    pub fn score_artist(&self, artist: &Artist) -> u32 {
        let name = Field::new(&artist.name);
        let genre = Field::new(artist.genre.as_deref().unwrap_or(""));

        self.accumulate(|variant| {
            weight_if(name.starts_with(variant), WEIGHTS.prefix)
                + weight_if(name.contains(variant), WEIGHTS.contains)
                + name.phonetic(variant)
                + weight_if(name.skeleton_contains(variant), WEIGHTS.skeleton)
                + weight_if(genre.contains(variant), WEIGHTS.genre)
        })
    }

    pub fn score_album(&self, album: &AlbumEntity) -> u32 {
        let title = Field::new(&album.album.title);
        let genre = Field::new(album.album.genre.as_deref().unwrap_or(""));

        self.accumulate(|variant| {
            weight_if(title.equals(variant), WEIGHTS.exact)
                + weight_if(title.starts_with(variant), WEIGHTS.prefix)
                + weight_if(title.contains(variant), WEIGHTS.contains)
                + weight_if(genre.contains(variant), WEIGHTS.genre)
        })
    }

    /// Scores a track retrieved through its lyrics.
    pub fn score_lyrics(&self, track: &TrackEntity) -> u32 {
        let lyrics = Field::new(track.lyrics());
        self.accumulate(|variant| weight_if(lyrics.contains(variant), WEIGHTS.lyrics))
    }
}
