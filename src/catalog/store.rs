//! The store collaborator the search engine retrieves candidates from.

use super::filter::{AlbumFilter, ArtistFilter, TrackFilter};
use super::model::{AlbumEntity, Artist, TrackEntity};
use futures::future::BoxFuture;

/// Errors raised by a catalog store while answering a query.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Queryable catalog of tracks, artists and albums.
///
/// Every method returns all records matching the filter, unordered and with
/// relations populated. Implementations must be shareable across tasks.
pub trait CatalogStore: Send + Sync {
    fn find_tracks(&self, filter: TrackFilter) -> BoxFuture<'_, StoreResult<Vec<TrackEntity>>>;

    fn find_artists(&self, filter: ArtistFilter) -> BoxFuture<'_, StoreResult<Vec<Artist>>>;

    fn find_albums(&self, filter: AlbumFilter) -> BoxFuture<'_, StoreResult<Vec<AlbumEntity>>>;
}
