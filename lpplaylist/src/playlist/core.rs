//! PlaylistCore : séquence ordonnée d'entrées avec éviction FIFO
//!
//! Toutes les opérations sont totales : un index hors bornes est ramené dans
//! `[0, len]` et un identifiant d'entrée inconnu est ignoré. La capacité est
//! appliquée après chaque mutation, jamais avant.

use super::entry::{PlaylistEntry, PlaylistEntryView};
use lpcatalog::SongHandle;
use std::collections::{HashSet, VecDeque};
use uuid::Uuid;

/// Capacité par défaut d'une playlist
pub const MAX_ENTRIES: usize = 200;

/// Configuration d'une playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistConfig {
    pub max_entries: usize,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            max_entries: MAX_ENTRIES,
        }
    }
}

/// Noyau de la playlist (structure interne protégée par RwLock)
#[derive(Debug, Clone)]
pub struct PlaylistCore {
    entries: VecDeque<PlaylistEntry>,
    config: PlaylistConfig,
}

impl PlaylistCore {
    /// Crée un nouveau core
    pub fn new(config: PlaylistConfig) -> Self {
        Self {
            entries: VecDeque::new(),
            config,
        }
    }

    pub fn config(&self) -> PlaylistConfig {
        self.config
    }

    /// Ajoute les morceaux en fin de playlist
    pub fn append(&mut self, songs: Vec<SongHandle>) {
        self.insert(self.entries.len(), songs);
    }

    /// Insère les morceaux à partir de `index`, dans l'ordre donné
    ///
    /// Les entrées à partir de `index` sont décalées vers la fin. Si la
    /// capacité est dépassée, les entrées de tête sont évincées, y compris
    /// celles qui viennent d'être insérées.
    pub fn insert(&mut self, index: usize, songs: Vec<SongHandle>) {
        let index = index.min(self.entries.len());
        let tail = self.entries.split_off(index);
        self.entries.extend(songs.into_iter().map(PlaylistEntry::new));
        self.entries.extend(tail);
        self.evict();
    }

    /// Déplace une entrée ; `false` si l'identifiant est inconnu
    ///
    /// L'index cible est borné après le retrait de l'entrée.
    pub fn move_entry(&mut self, entry_id: Uuid, new_index: usize) -> bool {
        let Some(position) = self.position(entry_id) else {
            return false;
        };
        let Some(entry) = self.entries.remove(position) else {
            return false;
        };
        let new_index = new_index.min(self.entries.len());
        self.entries.insert(new_index, entry);
        true
    }

    /// Retire toutes les entrées dont l'identifiant est dans `entry_ids`
    ///
    /// Retourne le nombre d'entrées retirées ; l'ordre des autres est conservé.
    pub fn remove_many(&mut self, entry_ids: &HashSet<Uuid>) -> usize {
        let initial_len = self.entries.len();
        self.entries.retain(|e| !entry_ids.contains(&e.entry_id));
        initial_len - self.entries.len()
    }

    /// Vide complètement la playlist
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Applique la limite de taille (FIFO)
    fn evict(&mut self) {
        while self.entries.len() > self.config.max_entries {
            self.entries.pop_front();
        }
    }

    fn position(&self, entry_id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.entry_id == entry_id)
    }

    /// Nombre d'entrées
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistEntry> {
        self.entries.get(index)
    }

    /// Snapshot de toutes les entrées
    pub fn snapshot(&self) -> Vec<PlaylistEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Projection de toutes les entrées, avec les valeurs actuelles des morceaux
    pub fn views(&self) -> Vec<PlaylistEntryView> {
        self.entries.iter().map(PlaylistEntry::view).collect()
    }

    pub fn entry_ids(&self) -> Vec<Uuid> {
        self.entries.iter().map(|e| e.entry_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpcatalog::{Song, SongCatalog, SongMetadata};

    async fn songs(n: usize) -> Vec<SongHandle> {
        let catalog = SongCatalog::new();
        let mut handles = Vec::new();
        for i in 0..n {
            let song = Song::new(SongMetadata::new(format!("artist{i}"), format!("title{i}")));
            catalog.create(song.clone()).await;
            handles.push(catalog.handle(song.id).await.unwrap());
        }
        handles
    }

    fn titles(core: &PlaylistCore) -> Vec<String> {
        core.views().into_iter().map(|v| v.title).collect()
    }

    fn core_with_capacity(max_entries: usize) -> PlaylistCore {
        PlaylistCore::new(PlaylistConfig { max_entries })
    }

    #[tokio::test]
    async fn test_insert_preserves_order() {
        let s = songs(4).await;
        let mut core = PlaylistCore::new(PlaylistConfig::default());

        // [X, Y] puis insertion de [A, B] à l'index 1 : [X, A, B, Y]
        core.append(vec![s[0].clone(), s[1].clone()]);
        core.insert(1, vec![s[2].clone(), s[3].clone()]);

        assert_eq!(titles(&core), vec!["title0", "title2", "title3", "title1"]);
    }

    #[tokio::test]
    async fn test_insert_index_is_clamped() {
        let s = songs(4).await;
        let mut clamped = PlaylistCore::new(PlaylistConfig::default());
        clamped.append(s[..3].to_vec());
        clamped.insert(99, vec![s[3].clone()]);

        let mut appended = PlaylistCore::new(PlaylistConfig::default());
        appended.append(s[..3].to_vec());
        appended.append(vec![s[3].clone()]);

        assert_eq!(titles(&clamped), titles(&appended));
    }

    #[tokio::test]
    async fn test_same_song_twice_gives_distinct_entries() {
        let s = songs(1).await;
        let mut core = PlaylistCore::new(PlaylistConfig::default());
        core.append(vec![s[0].clone(), s[0].clone()]);

        let ids = core.entry_ids();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_eviction_removes_oldest_positions() {
        let s = songs(5).await;
        let mut core = core_with_capacity(3);
        core.append(s[..3].to_vec());

        // Insertion en tête : les nouvelles entrées sont en position 0 et sont évincées
        core.insert(0, vec![s[3].clone()]);
        assert_eq!(titles(&core), vec!["title0", "title1", "title2"]);

        core.append(vec![s[4].clone()]);
        assert_eq!(titles(&core), vec!["title1", "title2", "title4"]);
    }

    #[tokio::test]
    async fn test_batch_larger_than_capacity() {
        let s = songs(5).await;
        let mut core = core_with_capacity(2);
        core.append(s.clone());
        assert_eq!(titles(&core), vec!["title3", "title4"]);
    }

    #[tokio::test]
    async fn test_fifo_at_full_capacity() {
        let s = songs(1).await;
        let mut core = PlaylistCore::new(PlaylistConfig::default());
        core.append(vec![s[0].clone(); MAX_ENTRIES]);
        let before = core.entry_ids();

        let extra = songs(1).await;
        core.append(extra.clone());

        let after = core.entry_ids();
        assert_eq!(after.len(), MAX_ENTRIES);
        assert_eq!(&after[..MAX_ENTRIES - 1], &before[1..]);
        assert_eq!(core.get(MAX_ENTRIES - 1).unwrap().song.id(), extra[0].id());
    }

    #[tokio::test]
    async fn test_move_entry() {
        let s = songs(4).await;
        let mut core = PlaylistCore::new(PlaylistConfig::default());
        core.append(s.clone());
        let ids = core.entry_ids();

        assert!(core.move_entry(ids[0], 2));
        assert_eq!(titles(&core), vec!["title1", "title2", "title0", "title3"]);

        // Au-delà de la fin : l'entrée se retrouve en dernier
        assert!(core.move_entry(ids[1], 1000));
        assert_eq!(titles(&core), vec!["title2", "title0", "title3", "title1"]);

        assert!(core.move_entry(ids[1], 3));
        assert_eq!(titles(&core), vec!["title2", "title0", "title3", "title1"]);
        assert_eq!(core.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_no_ops() {
        let s = songs(3).await;
        let mut core = PlaylistCore::new(PlaylistConfig::default());
        core.append(s.clone());
        let before = core.entry_ids();

        assert!(!core.move_entry(Uuid::new_v4(), 0));
        assert_eq!(core.remove_many(&HashSet::from([Uuid::new_v4()])), 0);
        assert_eq!(core.entry_ids(), before);
    }

    #[tokio::test]
    async fn test_remove_many_keeps_relative_order() {
        let s = songs(5).await;
        let mut core = PlaylistCore::new(PlaylistConfig::default());
        core.append(s.clone());
        let ids = core.entry_ids();

        let removed = core.remove_many(&HashSet::from([ids[1], ids[3], Uuid::new_v4()]));
        assert_eq!(removed, 2);
        assert_eq!(titles(&core), vec!["title0", "title2", "title4"]);

        core.clear();
        assert!(core.is_empty());
    }
}
