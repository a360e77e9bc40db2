//! Rank fusion and pagination of scored candidates.

use crate::catalog::{Entity, EntityId};
use ahash::AHashSet;
use serde::Serialize;
use std::fmt;

/// Which retrieval produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    Track,
    Artist,
    Album,
    /// A track found through its lyrics.
    Lyrics,
}

impl CandidateKind {
    /// The result type a candidate of this kind is reported as.
    pub const fn result_kind(self) -> ResultKind {
        match self {
            Self::Track | Self::Lyrics => ResultKind::Track,
            Self::Artist => ResultKind::Artist,
            Self::Album => ResultKind::Album,
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Track => "track",
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Lyrics => "lyrics",
        })
    }
}

/// The `type` of a search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Track,
    Artist,
    Album,
}

/// A retrieved entity with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub entity: Entity,
    pub score: u32,
}

impl Candidate {
    pub const fn new(kind: CandidateKind, entity: Entity, score: u32) -> Self {
        Self {
            kind,
            entity,
            score,
        }
    }

    fn dedup_key(&self) -> (ResultKind, EntityId) {
        (self.kind.result_kind(), self.entity.id().clone())
    }
}

/// Merges per-kind candidate lists into one ranking.
///
/// Lists are concatenated in the given order and stably sorted by descending
/// score, so ties keep concatenation order. Only the first (highest scored)
/// candidate per result type and entity id survives.
pub fn fuse(lists: impl IntoIterator<Item = Vec<Candidate>>) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = lists.into_iter().flatten().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let mut seen = AHashSet::with_capacity(ranked.len());
    ranked.retain(|candidate| seen.insert(candidate.dedup_key()));
    ranked
}

/// One entry of a search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub data: Entity,
    pub score: u32,
}

impl From<Candidate> for SearchHit {
    fn from(candidate: Candidate) -> Self {
        Self {
            kind: candidate.kind.result_kind(),
            data: candidate.entity,
            score: candidate.score,
        }
    }
}

/// A page of ranked results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub results: Vec<SearchHit>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Slices `ranked` to the 1-based `page` of `limit` results.
///
/// Pages past the end are empty. `limit` must be non-zero.
pub fn paginate(ranked: Vec<Candidate>, page: usize, limit: usize) -> SearchPage {
    let total = ranked.len();
    let start = page.saturating_sub(1).saturating_mul(limit);
    let results = ranked
        .into_iter()
        .skip(start)
        .take(limit)
        .map(SearchHit::from)
        .collect();

    SearchPage {
        results,
        total,
        page,
        total_pages: total.div_ceil(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Artist, Track, TrackEntity};
    use assert2::check;
    use rstest::rstest;

    fn artist(id: &str, score: u32) -> Candidate {
        let artist = Artist {
            id: id.into(),
            name: format!("Artist {id}"),
            genre: None,
        };
        Candidate::new(CandidateKind::Artist, Entity::Artist(artist), score)
    }

    fn track(kind: CandidateKind, id: &str, score: u32) -> Candidate {
        let track = Track {
            id: id.into(),
            title: format!("Track {id}"),
            artist_id: None,
            album_id: None,
            lyrics: None,
            duration_secs: None,
        };
        let entity = TrackEntity {
            track,
            artist: None,
            album: None,
        };
        Candidate::new(kind, Entity::Track(entity), score)
    }

    fn ids(ranked: &[Candidate]) -> Vec<&str> {
        ranked.iter().map(|c| c.entity.id().as_str()).collect()
    }

    #[test]
    fn test_fuse_sorts_descending_and_keeps_ties_stable() {
        let ranked = fuse([
            vec![track(CandidateKind::Track, "t1", 70)],
            vec![artist("a1", 70), artist("a2", 150)],
        ]);
        check!(ids(&ranked) == ["a2", "t1", "a1"]);
    }

    #[test]
    fn test_fuse_keeps_highest_scored_duplicate() {
        let ranked = fuse([
            vec![track(CandidateKind::Track, "t1", 70)],
            vec![],
            vec![],
            vec![track(CandidateKind::Lyrics, "t1", 140)],
        ]);
        check!(ranked.len() == 1);
        check!(ranked[0].score == 140);
        check!(ranked[0].kind.result_kind() == ResultKind::Track);
    }

    #[test]
    fn test_fuse_distinguishes_result_types_with_same_id() {
        let ranked = fuse([vec![track(CandidateKind::Track, "x", 10)], vec![artist("x", 10)]]);
        check!(ranked.len() == 2);
    }

    #[rstest]
    #[case(1, 2, vec!["a5", "a4"])]
    #[case(3, 2, vec!["a1"])]
    #[case(4, 2, vec![])]
    #[case(1, 10, vec!["a5", "a4", "a3", "a2", "a1"])]
    fn test_paginate(#[case] page: usize, #[case] limit: usize, #[case] expected: Vec<&str>) {
        let ranked = fuse([(1..=5).map(|n| artist(&format!("a{n}"), n * 10)).collect()]);
        let result = paginate(ranked, page, limit);

        let got: Vec<&str> = result.results.iter().map(|hit| hit.data.id().as_str()).collect();
        check!(got == expected);
        check!(result.total == 5);
        check!(result.page == page);
        check!(result.total_pages == 5usize.div_ceil(limit));
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::new(), 1, 10);
        check!(page.results.is_empty());
        check!(page.total == 0);
        check!(page.total_pages == 0);
    }

    #[test]
    fn test_search_page_wire_format() {
        let page = paginate(vec![track(CandidateKind::Lyrics, "t1", 20)], 1, 10);
        let value = serde_json::to_value(&page).unwrap();
        check!(value["results"][0]["type"] == "track");
        check!(value["results"][0]["data"]["id"] == "t1");
        check!(value["results"][0]["score"] == 20);
        check!(value["totalPages"] == 1);
    }
}
