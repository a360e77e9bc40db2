//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `catalog_document`: the sample catalog as a [`CatalogDocument`]
//! - `engine`: a [`SearchEngine`] over the sample catalog held in memory
//! - `temp_catalog`: the sample catalog written to a temporary JSON file
//!
//! [`ScriptedStore`] wraps a store to count retrievals or fail a chosen kind.

#![allow(dead_code)] // Helpers used across different integration test crates

use catalog_search::catalog::{
    AlbumEntity, AlbumFilter, Artist, ArtistFilter, CatalogDocument, CatalogStore, MemoryCatalog,
    StoreError, StoreResult, TrackEntity, TrackFilter,
};
use catalog_search::search::{SearchEngine, SearchPage};
use futures::FutureExt;
use futures::future::BoxFuture;
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// The sample catalog used across integration tests.
pub const SAMPLE_CATALOG: &str = r#"{
    "artists": [
        {"id": "a1", "name": "Billie", "genre": "Pop"},
        {"id": "a2", "name": "Billie Eilish", "genre": "Alt Pop"},
        {"id": "a3", "name": "Sigur Rós", "genre": "Post-rock"},
        {"id": "a4", "name": "Patti Smith", "genre": "Punk"},
        {"id": "a5", "name": "William Onyeabor", "genre": "Afrobeat"}
    ],
    "albums": [
        {"id": "al1", "title": "Happier Than Ever", "artistId": "a2", "genre": "Pop", "releaseYear": 2021},
        {"id": "al2", "title": "Sad Songs Collection", "artistId": "a4", "genre": "Punk"}
    ],
    "tracks": [
        {"id": "t1", "title": "This Sad Little Song", "artistId": "a4", "albumId": "al2",
         "lyrics": "a sad little song about nothing"},
        {"id": "t2", "title": "Sad Song", "artistId": "a1", "lyrics": "sad song, sad song"},
        {"id": "t3", "title": "Ocean Eyes", "artistId": "a2", "albumId": "al1",
         "lyrics": "no fair, you really know how to make me cry", "durationSecs": 200},
        {"id": "t4", "title": "Hoppípolla", "artistId": "a3"},
        {"id": "t5", "title": "Because the Night", "artistId": "a4",
         "lyrics": "take me now baby here as I am"}
    ]
}"#;

#[fixture]
pub fn catalog_document() -> CatalogDocument {
    serde_json::from_str(SAMPLE_CATALOG).expect("sample catalog must parse")
}

#[fixture]
pub fn engine(catalog_document: CatalogDocument) -> SearchEngine {
    let catalog = MemoryCatalog::from_document(catalog_document).expect("sample catalog is valid");
    SearchEngine::new(Arc::new(catalog))
}

/// A catalog JSON file in a temporary directory, removed on drop.
pub struct TempCatalog {
    _temp: TempDir,
    path: PathBuf,
}

impl TempCatalog {
    pub fn new(content: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("catalog.json");
        std::fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Failed to write '{}': {}", path.display(), e));
        Self { _temp: temp, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path in the same directory that does not exist.
    pub fn missing_path(&self) -> PathBuf {
        self.path.with_file_name("missing.json")
    }
}

#[fixture]
pub fn temp_catalog() -> TempCatalog {
    TempCatalog::new(SAMPLE_CATALOG)
}

/// Store wrapper that counts retrievals and can fail one kind.
pub struct ScriptedStore {
    inner: MemoryCatalog,
    calls: AtomicUsize,
    fail_artists: bool,
}

impl ScriptedStore {
    pub fn new(document: CatalogDocument) -> Self {
        Self {
            inner: MemoryCatalog::from_document(document).expect("sample catalog is valid"),
            calls: AtomicUsize::new(0),
            fail_artists: false,
        }
    }

    /// Makes every artist retrieval fail.
    pub fn failing_artists(mut self) -> Self {
        self.fail_artists = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CatalogStore for ScriptedStore {
    fn find_tracks(&self, filter: TrackFilter) -> BoxFuture<'_, StoreResult<Vec<TrackEntity>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_tracks(filter)
    }

    fn find_artists(&self, filter: ArtistFilter) -> BoxFuture<'_, StoreResult<Vec<Artist>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_artists {
            return async { Err(StoreError::Unavailable("artist index offline".to_string())) }
                .boxed();
        }
        self.inner.find_artists(filter)
    }

    fn find_albums(&self, filter: AlbumFilter) -> BoxFuture<'_, StoreResult<Vec<AlbumEntity>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_albums(filter)
    }
}

/// `(type, id, score)` of every hit on a page.
pub fn hits(page: &SearchPage) -> Vec<(String, String, u32)> {
    page.results
        .iter()
        .map(|hit| {
            let kind = serde_json::to_value(hit.kind).expect("kind serializes");
            (
                kind.as_str().unwrap_or_default().to_string(),
                hit.data.id().to_string(),
                hit.score,
            )
        })
        .collect()
}
