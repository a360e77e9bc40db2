//! Term expansion into match variants.
//!
//! Short terms carry too few characters for substring or edit-distance
//! matching to be reliable, so terms of up to [`MAX_ALIAS_TERM_CHARS`]
//! characters are also expanded through a table of known short names.

use super::normalize::normalize;
use super::phonetic::encode;
use ahash::AHashMap;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Terms longer than this are never alias-expanded.
pub const MAX_ALIAS_TERM_CHARS: usize = 4;

/// Builtin diminutives and short-name spellings.
const BUILTIN_ALIASES: &[(&str, &[&str])] = &[
    ("abby", &["abigail"]),
    ("al", &["albert", "alan", "alfred"]),
    ("alex", &["alexander", "alexandra", "alexis"]),
    ("andy", &["andrew", "andre"]),
    ("ben", &["benjamin", "benny"]),
    ("bev", &["beverly"]),
    ("bill", &["william", "billy", "billie"]),
    ("bili", &["billie", "billy", "bill"]),
    ("bily", &["billy", "billie"]),
    ("bob", &["robert", "bobby", "bobbie"]),
    ("cat", &["catherine", "cathy", "kat"]),
    ("chaz", &["charles"]),
    ("chuck", &["charles"]),
    ("dan", &["daniel", "danny"]),
    ("dave", &["david"]),
    ("ed", &["edward", "eddie", "edwin"]),
    ("gabe", &["gabriel"]),
    ("jim", &["james", "jimmy", "jimi"]),
    ("jimi", &["jimmy", "james"]),
    ("joe", &["joseph", "joey"]),
    ("jon", &["john", "jonathan", "jonny"]),
    ("kat", &["katherine", "kate", "katy"]),
    ("kate", &["katherine", "katy", "katie"]),
    ("katy", &["katherine", "kate", "katie"]),
    ("liz", &["elizabeth", "eliza", "lizzy"]),
    ("lou", &["louis", "louise"]),
    ("matt", &["matthew"]),
    ("max", &["maxwell", "maximilian"]),
    ("mike", &["michael", "mick"]),
    ("nick", &["nicholas", "nicky"]),
    ("pat", &["patrick", "patricia", "patti"]),
    ("pete", &["peter"]),
    ("rob", &["robert", "robbie"]),
    ("ron", &["ronald", "ronnie"]),
    ("sam", &["samuel", "samantha", "sammy"]),
    ("stev", &["steve", "steven", "stevie"]),
    ("tom", &["thomas", "tommy"]),
    ("tony", &["anthony", "antonio"]),
    ("will", &["william", "willie"]),
];

static BUILTIN: LazyLock<AliasTable> = LazyLock::new(|| {
    AliasTable::from_entries(
        BUILTIN_ALIASES
            .iter()
            .map(|(key, aliases)| (key.to_string(), aliases.iter().map(|a| a.to_string()).collect())),
    )
});

/// Mapping from short terms to their known aliases.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: AHashMap<String, Vec<String>>,
}

impl AliasTable {
    /// The builtin table.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Builds a table from arbitrary entries, normalizing keys and aliases.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let mut table = Self::default();
        for (key, aliases) in entries {
            table.insert(&key, aliases);
        }
        table
    }

    /// The builtin table with `extra` entries added on top.
    ///
    /// Aliases for a key already present are appended after the builtin ones.
    pub fn with_extra(extra: &HashMap<String, Vec<String>>) -> Self {
        let mut table = Self::builtin().clone();
        // Sorted so that repeated builds produce the same alias order.
        let mut keys: Vec<&String> = extra.keys().collect();
        keys.sort();
        for key in keys {
            table.insert(key, extra[key].clone());
        }
        table
    }

    fn insert(&mut self, key: &str, aliases: Vec<String>) {
        let key = normalize(key.trim());
        if key.is_empty() {
            return;
        }
        let aliases = aliases
            .iter()
            .map(|alias| normalize(alias.trim()))
            .filter(|alias| !alias.is_empty());
        self.entries.entry(key).or_default().extend(aliases);
    }

    /// Aliases of `term`, empty if the term is too long or unknown.
    pub fn lookup(&self, term: &str) -> &[String] {
        if term.chars().count() > MAX_ALIAS_TERM_CHARS {
            return &[];
        }
        self.entries.get(term).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Expands a term into its match variants: the term, its phonetic codes, then
/// any aliases.
///
/// Duplicates are kept; every variant is scored on its own.
pub fn variations(term: &str, aliases: &AliasTable) -> Vec<String> {
    let mut variants = vec![term.to_string()];
    variants.extend(encode(term).iter().map(str::to_string));
    variants.extend(aliases.lookup(term).iter().cloned());
    variants
}
