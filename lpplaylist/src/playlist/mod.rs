//! Playlist interne (gérée par le PlaylistDirectory)

pub mod core;
pub mod entry;

use self::core::{PlaylistConfig, PlaylistCore};
use self::entry::PlaylistEntryView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// État d'une playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum PlaylistState {
    Active = 0,
    Deleted = 1,
}

impl From<u8> for PlaylistState {
    fn from(value: u8) -> Self {
        match value {
            1 => PlaylistState::Deleted,
            _ => PlaylistState::Active,
        }
    }
}

/// Attributs d'une playlist, remplacés en bloc par une mise à jour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistMetadata {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl PlaylistMetadata {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Vue figée d'une playlist et de ses entrées
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSnapshot {
    pub id: Uuid,
    pub metadata: PlaylistMetadata,
    pub entries: Vec<PlaylistEntryView>,
    pub last_change: DateTime<Utc>,
}

impl PlaylistSnapshot {
    pub fn is_owned_by(&self, caller: &str) -> bool {
        crate::guard::is_owner(&self.metadata.owner, caller)
    }
}

/// Playlist interne
pub struct Playlist {
    pub id: Uuid,
    metadata: RwLock<PlaylistMetadata>,
    state: AtomicU8,
    pub core: RwLock<PlaylistCore>,
    last_change: RwLock<DateTime<Utc>>,
}

impl Playlist {
    /// Crée une nouvelle playlist vide
    pub fn new(id: Uuid, metadata: PlaylistMetadata, config: PlaylistConfig) -> Self {
        Self {
            id,
            metadata: RwLock::new(metadata),
            state: AtomicU8::new(PlaylistState::Active as u8),
            core: RwLock::new(PlaylistCore::new(config)),
            last_change: RwLock::new(Utc::now()),
        }
    }

    /// Vérifie si la playlist est active
    pub fn is_alive(&self) -> bool {
        PlaylistState::from(self.state.load(Ordering::SeqCst)) == PlaylistState::Active
    }

    /// Marque la playlist comme supprimée
    ///
    /// Le verrou du core est pris pour qu'aucune mutation ne soit en cours.
    pub async fn mark_deleted(&self) {
        let _core = self.core.write().await;
        self.state
            .store(PlaylistState::Deleted as u8, Ordering::SeqCst);
    }

    /// Met à jour le timestamp de dernière modification
    pub async fn touch(&self) {
        *self.last_change.write().await = Utc::now();
    }

    pub async fn metadata(&self) -> PlaylistMetadata {
        self.metadata.read().await.clone()
    }

    pub async fn owner(&self) -> String {
        self.metadata.read().await.owner.clone()
    }

    /// Remplace les attributs
    pub async fn set_metadata(&self, metadata: PlaylistMetadata) {
        *self.metadata.write().await = metadata;
        self.touch().await;
    }

    /// Timestamp du dernier changement
    pub async fn last_change(&self) -> DateTime<Utc> {
        *self.last_change.read().await
    }

    pub async fn snapshot(&self) -> PlaylistSnapshot {
        let metadata = self.metadata().await;
        let entries = self.core.read().await.views();
        PlaylistSnapshot {
            id: self.id,
            metadata,
            entries,
            last_change: self.last_change().await,
        }
    }
}
