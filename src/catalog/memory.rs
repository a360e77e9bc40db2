//! In-memory catalog loaded from a JSON document.

use super::filter::{
    AlbumField, AlbumFilter, ArtistField, ArtistFilter, FieldText, TrackField, TrackFilter,
};
use super::model::{AlbumEntity, Artist, CatalogDocument, EntityId, TrackEntity};
use super::store::{CatalogStore, StoreResult};
use crate::error::CatalogLoadError;
use ahash::AHashMap;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Record counts of a loaded catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub artists: usize,
    pub albums: usize,
    pub tracks: usize,
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} artists, {} albums, {} tracks",
            self.artists, self.albums, self.tracks
        )
    }
}

struct TrackRow {
    entity: TrackEntity,
    title: FieldText,
    lyrics: FieldText,
}

struct ArtistRow {
    artist: Artist,
    name: FieldText,
    genre: FieldText,
}

struct AlbumRow {
    entity: AlbumEntity,
    title: FieldText,
    genre: FieldText,
}

/// A fully resident catalog with relations resolved at load time.
pub struct MemoryCatalog {
    tracks: Vec<TrackRow>,
    artists: Vec<ArtistRow>,
    albums: Vec<AlbumRow>,
}

impl fmt::Debug for MemoryCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCatalog")
            .field("stats", &self.stats())
            .finish()
    }
}

impl MemoryCatalog {
    /// Reads and validates a catalog JSON file.
    pub async fn from_file(path: &Path) -> Result<Self, CatalogLoadError> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
        let document: CatalogDocument =
            serde_json::from_str(&content).map_err(|source| CatalogLoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_document(document)
    }

    /// Builds a catalog, rejecting duplicate ids and references to missing records.
    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogLoadError> {
        let artists_by_id = index_by_id("artist", &document.artists, |artist| &artist.id)?;
        let albums_by_id = index_by_id("album", &document.albums, |album| &album.id)?;
        index_by_id("track", &document.tracks, |track| &track.id)?;

        let resolve_artist = |kind: &'static str, id: &EntityId, artist_id: Option<&EntityId>| {
            resolve(kind, id, "artist", artist_id, &artists_by_id)
        };

        let mut albums = Vec::with_capacity(document.albums.len());
        for album in &document.albums {
            let artist = resolve_artist("album", &album.id, album.artist_id.as_ref())?;
            albums.push(AlbumRow {
                title: FieldText::new(&album.title),
                genre: FieldText::new(album.genre.as_deref().unwrap_or("")),
                entity: AlbumEntity {
                    album: album.clone(),
                    artist: artist.cloned(),
                },
            });
        }

        let mut tracks = Vec::with_capacity(document.tracks.len());
        for track in document.tracks {
            let artist = resolve_artist("track", &track.id, track.artist_id.as_ref())?;
            let album = resolve(
                "track",
                &track.id,
                "album",
                track.album_id.as_ref(),
                &albums_by_id,
            )?;
            tracks.push(TrackRow {
                title: FieldText::new(&track.title),
                lyrics: FieldText::new(track.lyrics.as_deref().unwrap_or("")),
                entity: TrackEntity {
                    artist: artist.cloned(),
                    album: album.cloned(),
                    track,
                },
            });
        }

        let artists = document
            .artists
            .iter()
            .map(|artist| ArtistRow {
                name: FieldText::new(&artist.name),
                genre: FieldText::new(artist.genre.as_deref().unwrap_or("")),
                artist: artist.clone(),
            })
            .collect();

        Ok(Self {
            tracks,
            artists,
            albums,
        })
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            artists: self.artists.len(),
            albums: self.albums.len(),
            tracks: self.tracks.len(),
        }
    }

    fn tracks_matching(&self, filter: &TrackFilter) -> StoreResult<Vec<TrackEntity>> {
        let compiled = filter.compile()?;
        Ok(self
            .tracks
            .iter()
            .filter(|row| {
                compiled.matches(|field| match field {
                    TrackField::Title => &row.title,
                    TrackField::Lyrics => &row.lyrics,
                })
            })
            .map(|row| row.entity.clone())
            .collect())
    }

    fn artists_matching(&self, filter: &ArtistFilter) -> StoreResult<Vec<Artist>> {
        let compiled = filter.compile()?;
        Ok(self
            .artists
            .iter()
            .filter(|row| {
                compiled.matches(|field| match field {
                    ArtistField::Name => &row.name,
                    ArtistField::Genre => &row.genre,
                })
            })
            .map(|row| row.artist.clone())
            .collect())
    }

    fn albums_matching(&self, filter: &AlbumFilter) -> StoreResult<Vec<AlbumEntity>> {
        let compiled = filter.compile()?;
        Ok(self
            .albums
            .iter()
            .filter(|row| {
                compiled.matches(|field| match field {
                    AlbumField::Title => &row.title,
                    AlbumField::Genre => &row.genre,
                })
            })
            .map(|row| row.entity.clone())
            .collect())
    }
}

impl CatalogStore for MemoryCatalog {
    fn find_tracks(&self, filter: TrackFilter) -> BoxFuture<'_, StoreResult<Vec<TrackEntity>>> {
        async move { self.tracks_matching(&filter) }.boxed()
    }

    fn find_artists(&self, filter: ArtistFilter) -> BoxFuture<'_, StoreResult<Vec<Artist>>> {
        async move { self.artists_matching(&filter) }.boxed()
    }

    fn find_albums(&self, filter: AlbumFilter) -> BoxFuture<'_, StoreResult<Vec<AlbumEntity>>> {
        async move { self.albums_matching(&filter) }.boxed()
    }
}

fn index_by_id<'a, T>(
    kind: &'static str,
    records: &'a [T],
    id: impl Fn(&T) -> &EntityId,
) -> Result<AHashMap<&'a str, &'a T>, CatalogLoadError> {
    let mut by_id = AHashMap::with_capacity(records.len());
    for record in records {
        let record_id = id(record).as_str();
        if by_id.insert(record_id, record).is_some() {
            return Err(CatalogLoadError::DuplicateId {
                kind,
                id: record_id.to_string(),
            });
        }
    }
    Ok(by_id)
}

fn resolve<'a, T>(
    kind: &'static str,
    id: &EntityId,
    target: &'static str,
    target_id: Option<&EntityId>,
    by_id: &AHashMap<&str, &'a T>,
) -> Result<Option<&'a T>, CatalogLoadError> {
    let Some(target_id) = target_id else {
        return Ok(None);
    };
    by_id
        .get(target_id.as_str())
        .copied()
        .map(Some)
        .ok_or_else(|| CatalogLoadError::DanglingReference {
            kind,
            id: id.to_string(),
            target,
            target_id: target_id.to_string(),
        })
}
