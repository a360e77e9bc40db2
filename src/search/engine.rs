//! The search entry point: validate, retrieve, score, fuse, paginate.

use super::normalize::normalize_search_terms;
use super::rank::{Candidate, CandidateKind, SearchPage, fuse, paginate};
use super::retrieve::retrieve;
use super::scoring::Scorer;
use super::variations::AliasTable;
use crate::catalog::{CatalogStore, Entity};
use crate::error::{SearchError, ValidationError};
use std::sync::Arc;
use std::time::Instant;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_MAX_LIMIT: usize = 100;

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    text: String,
    page: usize,
    limit: usize,
}

impl SearchQuery {
    /// Validates the raw request parameters.
    ///
    /// The query must contain a non-whitespace character; `page` and `limit`
    /// must be positive.
    pub fn new(query: impl Into<String>, page: i64, limit: i64) -> Result<Self, ValidationError> {
        let text = query.into();
        if text.trim().is_empty() {
            return Err(ValidationError::new("query", "must not be empty"));
        }
        Ok(Self {
            text,
            page: positive("page", page)?,
            limit: positive("limit", limit)?,
        })
    }

    /// A query for the first page with the default limit.
    pub fn first_page(query: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(query, DEFAULT_PAGE, DEFAULT_LIMIT)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }
}

fn positive(field: &'static str, value: i64) -> Result<usize, ValidationError> {
    usize::try_from(value)
        .ok()
        .filter(|&value| value > 0)
        .ok_or_else(|| ValidationError::new(field, format!("must be a positive integer, got {value}")))
}

/// Ranks catalog entities against free-text queries.
#[derive(Clone)]
pub struct SearchEngine {
    store: Arc<dyn CatalogStore>,
    aliases: Arc<AliasTable>,
    max_limit: usize,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("aliases", &self.aliases.len())
            .field("max_limit", &self.max_limit)
            .finish()
    }
}

impl SearchEngine {
    /// An engine over `store` with the builtin alias table.
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            aliases: Arc::new(AliasTable::builtin().clone()),
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: Arc<AliasTable>) -> Self {
        self.aliases = aliases;
        self
    }

    #[must_use]
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit;
        self
    }

    pub const fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Runs a search and returns the requested page.
    ///
    /// Retrieval for all kinds runs concurrently; any store failure fails the
    /// whole search with no partial results.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage, SearchError> {
        if query.limit > self.max_limit {
            return Err(ValidationError::new(
                "limit",
                format!("must be at most {}, got {}", self.max_limit, query.limit),
            )
            .into());
        }

        let start = Instant::now();
        let terms = normalize_search_terms(&query.text);
        let retrieved = retrieve(self.store.as_ref(), &query.text, &terms, &self.aliases).await?;
        tracing::debug!(
            tracks = retrieved.tracks.len(),
            artists = retrieved.artists.len(),
            albums = retrieved.albums.len(),
            lyrics = retrieved.lyrics.len(),
            "Retrieved candidates for {:?}",
            query.text
        );

        let scorer = Scorer::new(&query.text, &terms, &self.aliases);
        let tracks: Vec<Candidate> = retrieved
            .tracks
            .into_iter()
            .map(|track| {
                let score = scorer.score_track(&track);
                Candidate::new(CandidateKind::Track, Entity::Track(track), score)
            })
            .collect();
        let artists: Vec<Candidate> = retrieved
            .artists
            .into_iter()
            .map(|artist| {
                let score = scorer.score_artist(&artist);
                Candidate::new(CandidateKind::Artist, Entity::Artist(artist), score)
            })
            .collect();
        let albums: Vec<Candidate> = retrieved
            .albums
            .into_iter()
            .map(|album| {
                let score = scorer.score_album(&album);
                Candidate::new(CandidateKind::Album, Entity::Album(album), score)
            })
            .collect();
        let lyrics: Vec<Candidate> = retrieved
            .lyrics
            .into_iter()
            .map(|track| {
                let score = scorer.score_lyrics(&track);
                Candidate::new(CandidateKind::Lyrics, Entity::Track(track), score)
            })
            .collect();

        let ranked = fuse([tracks, artists, albums, lyrics]);
        let page = paginate(ranked, query.page, query.limit);
        tracing::info!(
            "Search {:?} matched {} results in {:?}",
            query.text,
            page.total,
            start.elapsed()
        );
        Ok(page)
    }
}
