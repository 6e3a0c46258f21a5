//! PlaylistEntry : une occurrence positionnée d'un morceau

use lpcatalog::SongHandle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entrée d'une playlist
///
/// L'entrée ne stocke que sa propre identité et une référence vers le morceau ;
/// artiste et titre sont lus sur le morceau au moment de la projection.
#[derive(Debug, Clone)]
pub struct PlaylistEntry {
    pub entry_id: Uuid,
    pub song: SongHandle,
}

impl PlaylistEntry {
    /// Nouvelle entrée avec un identifiant frais
    pub fn new(song: SongHandle) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            song,
        }
    }

    pub fn view(&self) -> PlaylistEntryView {
        let metadata = self.song.metadata();
        PlaylistEntryView {
            entry_id: self.entry_id,
            song_id: self.song.id(),
            artist: metadata.artist,
            title: metadata.title,
        }
    }
}

/// Projection sérialisable d'une entrée
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "lpserver", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntryView {
    pub entry_id: Uuid,
    pub song_id: Uuid,
    pub artist: String,
    pub title: String,
}
