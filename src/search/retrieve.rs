//! Candidate retrieval: one store query per result kind, run concurrently.

use super::normalize::Term;
use super::phonetic::encode;
use super::rank::CandidateKind;
use super::variations::AliasTable;
use crate::catalog::{
    AlbumEntity, AlbumField, AlbumFilter, Artist, ArtistField, ArtistFilter, CatalogStore,
    StoreError, TextMatch, TrackEntity, TrackField, TrackFilter,
};
use crate::error::SearchError;

/// Unscored records returned by the four retrievals.
#[derive(Debug, Default)]
pub struct Retrieved {
    pub tracks: Vec<TrackEntity>,
    pub artists: Vec<Artist>,
    pub albums: Vec<AlbumEntity>,
    /// Tracks whose lyrics matched.
    pub lyrics: Vec<TrackEntity>,
}

/// Tracks whose title equals or contains the query, or contains every term.
///
/// Equality is against the query as typed, ignoring case only.
pub fn track_filter(query: &str, terms: &[Term]) -> TrackFilter {
    TrackFilter::new()
        .or(TrackField::Title, TextMatch::Equals(query.to_string()))
        .or(TrackField::Title, TextMatch::Contains(query.trim().to_string()))
        .or(TrackField::Title, TextMatch::ContainsAll(terms.to_vec()))
}

/// Artists whose name or genre contains every term, whose name sounds like a
/// term, or whose name contains an alias of a short term.
pub fn artist_filter(terms: &[Term], aliases: &AliasTable) -> ArtistFilter {
    let codes: Vec<String> = terms
        .iter()
        .flat_map(|term| encode(term).iter().map(str::to_string).collect::<Vec<_>>())
        .collect();

    let mut filter = ArtistFilter::new()
        .or(ArtistField::Name, TextMatch::ContainsAll(terms.to_vec()))
        .or(ArtistField::Genre, TextMatch::ContainsAll(terms.to_vec()))
        .or(ArtistField::Name, TextMatch::SoundsLike(codes));
    for alias in terms.iter().flat_map(|term| aliases.lookup(term)) {
        filter = filter.or(ArtistField::Name, TextMatch::Contains(alias.clone()));
    }
    filter
}

/// Albums whose title or genre contains every term.
pub fn album_filter(terms: &[Term]) -> AlbumFilter {
    AlbumFilter::new()
        .or(AlbumField::Title, TextMatch::ContainsAll(terms.to_vec()))
        .or(AlbumField::Genre, TextMatch::ContainsAll(terms.to_vec()))
}

/// Tracks whose lyrics contain every term.
pub fn lyrics_filter(terms: &[Term]) -> TrackFilter {
    TrackFilter::new().or(TrackField::Lyrics, TextMatch::ContainsAll(terms.to_vec()))
}

/// Runs all four retrievals concurrently.
///
/// The first store failure aborts the others and is returned tagged with the
/// kind that failed.
pub async fn retrieve(
    store: &dyn CatalogStore,
    query: &str,
    terms: &[Term],
    aliases: &AliasTable,
) -> Result<Retrieved, SearchError> {
    let (tracks, artists, albums, lyrics) = tokio::try_join!(
        async {
            store
                .find_tracks(track_filter(query, terms))
                .await
                .map_err(failed(CandidateKind::Track))
        },
        async {
            store
                .find_artists(artist_filter(terms, aliases))
                .await
                .map_err(failed(CandidateKind::Artist))
        },
        async {
            store
                .find_albums(album_filter(terms))
                .await
                .map_err(failed(CandidateKind::Album))
        },
        async {
            store
                .find_tracks(lyrics_filter(terms))
                .await
                .map_err(failed(CandidateKind::Lyrics))
        },
    )?;

    Ok(Retrieved {
        tracks,
        artists,
        albums,
        lyrics,
    })
}

fn failed(kind: CandidateKind) -> impl FnOnce(StoreError) -> SearchError {
    move |source| SearchError::Retrieval { kind, source }
}
