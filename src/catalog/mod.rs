//! Catalog entities and the stores that serve them to the search engine.

pub mod filter;
pub mod memory;
pub mod model;
pub mod store;

pub use filter::{
    AlbumField, AlbumFilter, ArtistField, ArtistFilter, Criterion, Filter, TextMatch, TrackField,
    TrackFilter,
};
pub use memory::{CatalogStats, MemoryCatalog};
pub use model::{
    Album, AlbumEntity, Artist, CatalogDocument, Entity, EntityId, Track, TrackEntity,
};
pub use store::{CatalogStore, StoreError, StoreResult};
