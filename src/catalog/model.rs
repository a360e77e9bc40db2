//! Catalog entities and their relation-resolved forms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: EntityId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: EntityId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
}

/// An album with its artist populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumEntity {
    #[serde(flatten)]
    pub album: Album,
    pub artist: Option<Artist>,
}

impl AlbumEntity {
    /// Artist name, or `""` when the album has no linked artist.
    pub fn artist_name(&self) -> &str {
        self.artist.as_ref().map_or("", |artist| artist.name.as_str())
    }
}

/// A track with its artist and album populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackEntity {
    #[serde(flatten)]
    pub track: Track,
    pub artist: Option<Artist>,
    pub album: Option<Album>,
}

impl TrackEntity {
    /// Artist name, or `""` when the track has no linked artist.
    pub fn artist_name(&self) -> &str {
        self.artist.as_ref().map_or("", |artist| artist.name.as_str())
    }

    /// Album title, or `""` when the track has no linked album.
    pub fn album_title(&self) -> &str {
        self.album.as_ref().map_or("", |album| album.title.as_str())
    }

    /// Lyrics, or `""` when the track has none.
    pub fn lyrics(&self) -> &str {
        self.track.lyrics.as_deref().unwrap_or("")
    }
}

/// Any searchable entity, as returned in results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Track(TrackEntity),
    Artist(Artist),
    Album(AlbumEntity),
}

impl Entity {
    pub fn id(&self) -> &EntityId {
        match self {
            Self::Track(entity) => &entity.track.id,
            Self::Artist(artist) => &artist.id,
            Self::Album(entity) => &entity.album.id,
        }
    }
}

/// The on-disk catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn track() -> Track {
        Track {
            id: "t1".into(),
            title: "Ocean Eyes".to_string(),
            artist_id: Some("a1".into()),
            album_id: None,
            lyrics: None,
            duration_secs: Some(200),
        }
    }

    #[test]
    fn test_missing_relations_read_as_empty() {
        let entity = TrackEntity {
            track: track(),
            artist: None,
            album: None,
        };
        check!(entity.artist_name().is_empty());
        check!(entity.album_title().is_empty());
        check!(entity.lyrics().is_empty());
    }

    #[test]
    fn test_track_entity_serializes_flat_camel_case() {
        let entity = Entity::Track(TrackEntity {
            track: track(),
            artist: Some(Artist {
                id: "a1".into(),
                name: "Billie Eilish".to_string(),
                genre: None,
            }),
            album: None,
        });

        let value = serde_json::to_value(&entity).unwrap();
        check!(value["id"] == "t1");
        check!(value["artistId"] == "a1");
        check!(value["durationSecs"] == 200);
        check!(value["artist"]["name"] == "Billie Eilish");
        check!(value["album"].is_null());
    }

    #[test]
    fn test_catalog_document_defaults_missing_sections() {
        let doc: CatalogDocument =
            serde_json::from_str(r#"{"artists":[{"id":"a1","name":"Muse"}]}"#).unwrap();
        check!(doc.artists.len() == 1);
        check!(doc.albums.is_empty());
        check!(doc.tracks.is_empty());
    }
}
