//! WriteHandle : mutations des entrées d'une playlist
//!
//! Chaque opération prend le verrou d'écriture du core pendant toute la
//! mutation, puis retourne la séquence d'entrées qui en résulte.

use std::collections::HashSet;
use std::sync::Arc;

use lpcatalog::SongHandle;
use tokio::sync::RwLockWriteGuard;
use uuid::Uuid;

use crate::Result;
use crate::directory::EventNotifier;
use crate::events::PlaylistEventKind;
use crate::playlist::core::PlaylistCore;
use crate::playlist::entry::PlaylistEntryView;
use crate::playlist::{Playlist, PlaylistMetadata};

/// Handle d'écriture sur une playlist
pub struct WriteHandle {
    playlist: Arc<Playlist>,
    notifier: EventNotifier,
    source_client: Option<String>,
}

impl WriteHandle {
    /// Crée un nouveau handle d'écriture
    pub(crate) fn new(playlist: Arc<Playlist>, notifier: EventNotifier) -> Self {
        Self {
            playlist,
            notifier,
            source_client: None,
        }
    }

    /// Renseigne l'appelant, repris dans les évènements émis
    pub fn on_behalf_of(mut self, caller: impl Into<String>) -> Self {
        self.source_client = Some(caller.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.playlist.id
    }

    pub async fn owner(&self) -> String {
        self.playlist.owner().await
    }

    pub async fn metadata(&self) -> PlaylistMetadata {
        self.playlist.metadata().await
    }

    /// Entrées courantes
    pub async fn entries(&self) -> Vec<PlaylistEntryView> {
        self.playlist.core.read().await.views()
    }

    async fn lock_core(&self) -> Result<RwLockWriteGuard<'_, PlaylistCore>> {
        let core = self.playlist.core.write().await;
        if !self.playlist.is_alive() {
            return Err(crate::Error::PlaylistNotFound(self.playlist.id));
        }
        Ok(core)
    }

    async fn mutate<F, T>(&self, f: F) -> Result<(T, Vec<PlaylistEntryView>)>
    where
        F: FnOnce(&mut PlaylistCore) -> T,
    {
        let mut core = self.lock_core().await?;
        let outcome = f(&mut *core);
        let views = core.views();
        drop(core);

        self.playlist.touch().await;
        self.notifier.notify(
            self.playlist.id,
            PlaylistEventKind::EntriesChanged,
            self.source_client.clone(),
        );
        Ok((outcome, views))
    }

    /// Ajoute des morceaux en fin de playlist
    pub async fn append(&self, songs: Vec<SongHandle>) -> Result<Vec<PlaylistEntryView>> {
        let count = songs.len();
        let (_, views) = self.mutate(|core| core.append(songs)).await?;
        tracing::debug!(playlist_id = %self.playlist.id, count, "Songs appended");
        Ok(views)
    }

    /// Insère des morceaux à `index` (borné à la longueur courante)
    pub async fn insert(
        &self,
        index: usize,
        songs: Vec<SongHandle>,
    ) -> Result<Vec<PlaylistEntryView>> {
        let count = songs.len();
        let (_, views) = self.mutate(|core| core.insert(index, songs)).await?;
        tracing::debug!(playlist_id = %self.playlist.id, index, count, "Songs inserted");
        Ok(views)
    }

    /// Déplace une entrée ; un identifiant inconnu laisse la playlist intacte
    pub async fn move_entry(
        &self,
        entry_id: Uuid,
        new_index: usize,
    ) -> Result<Vec<PlaylistEntryView>> {
        let (moved, views) = self
            .mutate(|core| core.move_entry(entry_id, new_index))
            .await?;
        if !moved {
            tracing::debug!(playlist_id = %self.playlist.id, entry_id = %entry_id, "Move ignored, unknown entry");
        }
        Ok(views)
    }

    /// Retire un ensemble d'entrées ; les identifiants inconnus sont ignorés
    pub async fn remove_many(&self, entry_ids: &HashSet<Uuid>) -> Result<Vec<PlaylistEntryView>> {
        let (removed, views) = self.mutate(|core| core.remove_many(entry_ids)).await?;
        tracing::debug!(playlist_id = %self.playlist.id, removed, "Entries removed");
        Ok(views)
    }

    /// Vide la playlist
    pub async fn clear(&self) -> Result<Vec<PlaylistEntryView>> {
        let (_, views) = self.mutate(PlaylistCore::clear).await?;
        tracing::debug!(playlist_id = %self.playlist.id, "Playlist cleared");
        Ok(views)
    }
}
