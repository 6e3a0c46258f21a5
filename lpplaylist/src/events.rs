//! Évènements émis à chaque modification d'une playlist

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Type d'évènement émis par le PlaylistDirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEvent {
    pub playlist_id: Uuid,
    pub kind: PlaylistEventKind,
}

/// Variantes d'évènements playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistEventKind {
    /// La playlist vient d'être créée
    Created,
    /// Nom ou description modifiés
    Updated,
    /// La séquence d'entrées a changé (ajout, déplacement, retrait, vidage)
    EntriesChanged,
    /// La playlist a été supprimée
    Deleted,
}

impl PlaylistEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistEventKind::Created => "created",
            PlaylistEventKind::Updated => "updated",
            PlaylistEventKind::EntriesChanged => "entries_changed",
            PlaylistEventKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for PlaylistEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evènement enrichi pour diffusion (timestamp + client à l'origine).
#[derive(Debug, Clone)]
pub struct PlaylistEventEnvelope {
    pub event: PlaylistEvent,
    pub timestamp: DateTime<Utc>,
    pub source_client: Option<String>,
}
