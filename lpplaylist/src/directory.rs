//! PlaylistDirectory : stockage des playlists indexées par identifiant
//!
//! Le répertoire est un objet explicite, cloné dans chaque handler. Chaque
//! playlist porte ses propres verrous : les mutations d'une même playlist sont
//! sérialisées, celles de playlists différentes avancent en parallèle.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::events::{PlaylistEvent, PlaylistEventEnvelope, PlaylistEventKind};
use crate::handle::WriteHandle;
use crate::playlist::core::PlaylistConfig;
use crate::playlist::{Playlist, PlaylistMetadata, PlaylistSnapshot};

#[derive(Default)]
struct Registry {
    playlists: HashMap<Uuid, Arc<Playlist>>,
    // ordre d'insertion pour get_all
    order: Vec<Uuid>,
}

/// Structure interne du répertoire
struct DirectoryInner {
    registry: RwLock<Registry>,
    config: PlaylistConfig,
    event_tx: broadcast::Sender<PlaylistEventEnvelope>,
}

/// Diffuse les évènements playlist aux abonnés
#[derive(Clone)]
pub(crate) struct EventNotifier {
    tx: broadcast::Sender<PlaylistEventEnvelope>,
}

impl EventNotifier {
    pub(crate) fn notify(
        &self,
        playlist_id: Uuid,
        kind: PlaylistEventKind,
        source_client: Option<String>,
    ) {
        debug!(playlist_id = %playlist_id, kind = %kind, "Playlist event");
        let envelope = PlaylistEventEnvelope {
            event: PlaylistEvent { playlist_id, kind },
            timestamp: Utc::now(),
            source_client,
        };
        // Aucun abonné n'est pas une erreur
        let _ = self.tx.send(envelope);
    }
}

/// Répertoire central des playlists
#[derive(Clone)]
pub struct PlaylistDirectory {
    inner: Arc<DirectoryInner>,
}

impl Default for PlaylistDirectory {
    fn default() -> Self {
        Self::new(PlaylistConfig::default())
    }
}

impl PlaylistDirectory {
    /// Crée un répertoire vide ; `config` s'applique à chaque nouvelle playlist
    pub fn new(config: PlaylistConfig) -> Self {
        Self {
            inner: Arc::new(DirectoryInner {
                registry: RwLock::new(Registry::default()),
                config,
                event_tx: broadcast::channel(256).0,
            }),
        }
    }

    pub fn config(&self) -> PlaylistConfig {
        self.inner.config
    }

    pub(crate) fn notifier(&self) -> EventNotifier {
        EventNotifier {
            tx: self.inner.event_tx.clone(),
        }
    }

    /// S'abonne au flux d'évènements de toutes les playlists
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlaylistEventEnvelope> {
        self.inner.event_tx.subscribe()
    }

    async fn lookup(&self, id: Uuid) -> Option<Arc<Playlist>> {
        self.inner.registry.read().await.playlists.get(&id).cloned()
    }

    /// Crée une playlist vide ; `false` si l'identifiant existe déjà
    pub async fn create(&self, id: Uuid, metadata: PlaylistMetadata) -> bool {
        let source = Some(metadata.owner.clone());
        {
            let mut registry = self.inner.registry.write().await;
            if registry.playlists.contains_key(&id) {
                return false;
            }
            let playlist = Arc::new(Playlist::new(id, metadata, self.inner.config));
            registry.playlists.insert(id, playlist);
            registry.order.push(id);
        }

        info!(playlist_id = %id, "Playlist created");
        self.notifier()
            .notify(id, PlaylistEventKind::Created, source);
        true
    }

    /// Crée une playlist avec un identifiant frais
    pub async fn create_new(&self, metadata: PlaylistMetadata) -> Result<PlaylistSnapshot> {
        let id = Uuid::new_v4();
        if !self.create(id, metadata).await {
            return Err(Error::PlaylistAlreadyExists(id));
        }
        self.get_by_id(id).await.ok_or(Error::PlaylistNotFound(id))
    }

    /// Remplace les attributs d'une playlist ; `false` si elle n'existe pas
    ///
    /// Les entrées ne sont pas touchées.
    pub async fn update(&self, id: Uuid, metadata: PlaylistMetadata) -> bool {
        let Some(playlist) = self.lookup(id).await else {
            return false;
        };
        if !playlist.is_alive() {
            return false;
        }

        let source = Some(metadata.owner.clone());
        playlist.set_metadata(metadata).await;
        self.notifier()
            .notify(id, PlaylistEventKind::Updated, source);
        true
    }

    /// Supprime une playlist ; indique si elle était présente
    pub async fn delete(&self, id: Uuid) -> bool {
        let removed = {
            let mut registry = self.inner.registry.write().await;
            let removed = registry.playlists.remove(&id);
            if removed.is_some() {
                registry.order.retain(|k| *k != id);
            }
            removed
        };

        match removed {
            Some(playlist) => {
                playlist.mark_deleted().await;
                info!(playlist_id = %id, "Playlist deleted");
                self.notifier()
                    .notify(id, PlaylistEventKind::Deleted, None);
                true
            }
            None => false,
        }
    }

    /// Vue figée d'une playlist, sans effet de bord
    pub async fn get_by_id(&self, id: Uuid) -> Option<PlaylistSnapshot> {
        match self.lookup(id).await {
            Some(playlist) => Some(playlist.snapshot().await),
            None => None,
        }
    }

    /// Vue figée de toutes les playlists, dans l'ordre d'insertion
    pub async fn get_all(&self) -> Vec<PlaylistSnapshot> {
        let playlists: Vec<Arc<Playlist>> = {
            let registry = self.inner.registry.read().await;
            registry
                .order
                .iter()
                .filter_map(|id| registry.playlists.get(id).cloned())
                .collect()
        };

        let mut snapshots = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            snapshots.push(playlist.snapshot().await);
        }
        snapshots
    }

    pub async fn len(&self) -> usize {
        self.inner.registry.read().await.playlists.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Handle d'écriture sur les entrées d'une playlist
    pub async fn write_handle(&self, id: Uuid) -> Result<WriteHandle> {
        let playlist = self.lookup(id).await.ok_or(Error::PlaylistNotFound(id))?;
        Ok(WriteHandle::new(playlist, self.notifier()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(owner: &str, name: &str) -> PlaylistMetadata {
        PlaylistMetadata::new(owner, name, "")
    }

    #[tokio::test]
    async fn test_create_is_unique() {
        let directory = PlaylistDirectory::default();
        let id = Uuid::new_v4();

        assert!(directory.create(id, metadata("alice", "one")).await);
        assert!(!directory.create(id, metadata("bob", "two")).await);

        let snapshot = directory.get_by_id(id).await.unwrap();
        assert_eq!(snapshot.metadata.owner, "alice");
        assert!(snapshot.entries.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_metadata() {
        let directory = PlaylistDirectory::default();
        let id = Uuid::new_v4();

        assert!(!directory.update(id, metadata("alice", "x")).await);
        directory.create(id, metadata("alice", "one")).await;

        let replacement = PlaylistMetadata::new("alice", "renamed", "new description");
        assert!(directory.update(id, replacement.clone()).await);
        assert_eq!(directory.get_by_id(id).await.unwrap().metadata, replacement);
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let directory = PlaylistDirectory::default();
        let id = Uuid::new_v4();
        directory.create(id, metadata("alice", "one")).await;
        let writer = directory.write_handle(id).await.unwrap();

        assert!(directory.delete(id).await);
        assert!(!directory.delete(id).await);
        assert!(directory.get_by_id(id).await.is_none());

        // Un handle obtenu avant la suppression ne peut plus écrire
        assert!(matches!(
            writer.clear().await,
            Err(Error::PlaylistNotFound(_))
        ));
        assert!(matches!(
            directory.write_handle(id).await,
            Err(Error::PlaylistNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_all_in_insertion_order() {
        let directory = PlaylistDirectory::default();
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for (i, id) in ids.iter().enumerate() {
            directory
                .create(*id, metadata("alice", &format!("p{i}")))
                .await;
        }

        let all: Vec<Uuid> = directory.get_all().await.iter().map(|p| p.id).collect();
        assert_eq!(all, ids);
    }

    #[tokio::test]
    async fn test_events_are_published() {
        let directory = PlaylistDirectory::default();
        let mut rx = directory.subscribe_events();
        let id = Uuid::new_v4();

        directory.create(id, metadata("alice", "one")).await;
        directory.update(id, metadata("alice", "two")).await;
        directory.delete(id).await;

        let kinds: Vec<PlaylistEventKind> = vec![
            rx.recv().await.unwrap().event.kind,
            rx.recv().await.unwrap().event.kind,
            rx.recv().await.unwrap().event.kind,
        ];
        assert_eq!(
            kinds,
            vec![
                PlaylistEventKind::Created,
                PlaylistEventKind::Updated,
                PlaylistEventKind::Deleted
            ]
        );
    }
}
