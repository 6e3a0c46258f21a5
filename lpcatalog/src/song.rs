//! Morceaux du catalogue.
//!
//! Un morceau est partagé entre le catalogue et les entrées de playlist via
//! un [`SongHandle`]. Une mise à jour du catalogue modifie l'enregistrement en
//! place, elle est donc visible immédiatement à travers toutes les entrées.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Attributs modifiables d'un morceau
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "lpserver", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SongMetadata {
    pub artist: String,
    pub title: String,
}

impl SongMetadata {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Même artiste et même titre, sans tenir compte de la casse
    pub fn same_song(&self, artist: &str, title: &str) -> bool {
        self.artist.to_lowercase() == artist.to_lowercase()
            && self.title.to_lowercase() == title.to_lowercase()
    }
}

/// Vue figée d'un morceau
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "lpserver", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: Uuid,
    pub artist: String,
    pub title: String,
}

impl Song {
    /// Nouveau morceau avec un identifiant frais
    pub fn new(metadata: SongMetadata) -> Self {
        Self::with_id(Uuid::new_v4(), metadata)
    }

    pub fn with_id(id: Uuid, metadata: SongMetadata) -> Self {
        Self {
            id,
            artist: metadata.artist,
            title: metadata.title,
        }
    }

    pub fn metadata(&self) -> SongMetadata {
        SongMetadata::new(self.artist.clone(), self.title.clone())
    }

    pub fn same_song(&self, artist: &str, title: &str) -> bool {
        self.metadata().same_song(artist, title)
    }
}

/// Enregistrement vivant d'un morceau
#[derive(Debug)]
pub struct SongRecord {
    id: Uuid,
    metadata: RwLock<SongMetadata>,
}

/// Référence partagée vers un morceau du catalogue
pub type SongHandle = Arc<SongRecord>;

impl SongRecord {
    pub(crate) fn new(song: Song) -> SongHandle {
        Arc::new(Self {
            id: song.id,
            metadata: RwLock::new(SongMetadata::new(song.artist, song.title)),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn metadata(&self) -> SongMetadata {
        self.metadata
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn snapshot(&self) -> Song {
        Song::with_id(self.id, self.metadata())
    }

    pub(crate) fn replace(&self, metadata: SongMetadata) {
        *self.metadata.write().unwrap_or_else(PoisonError::into_inner) = metadata;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_song_ignores_case() {
        let song = Song::new(SongMetadata::new("Abc", "Xyz"));
        assert!(song.same_song("ABC", "xyz"));
        assert!(!song.same_song("Abc", "Xy"));
    }

    #[test]
    fn test_record_replace_is_seen_by_all_handles() {
        let record = SongRecord::new(Song::new(SongMetadata::new("a", "b")));
        let other = record.clone();

        record.replace(SongMetadata::new("c", "d"));

        let seen = other.snapshot();
        assert_eq!(seen.id, record.id());
        assert_eq!(seen.artist, "c");
        assert_eq!(seen.title, "d");
    }

    #[test]
    fn test_camel_case_json() {
        let song = Song::with_id(Uuid::nil(), SongMetadata::new("a", "b"));
        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["artist"], "a");
        assert_eq!(json["id"], Uuid::nil().to_string());
    }
}
