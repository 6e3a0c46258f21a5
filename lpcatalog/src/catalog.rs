//! Catalogue de morceaux en mémoire.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::song::{Song, SongHandle, SongMetadata, SongRecord};

#[derive(Default)]
struct CatalogInner {
    songs: HashMap<Uuid, SongHandle>,
    // ordre d'insertion pour les listings
    order: Vec<Uuid>,
}

impl CatalogInner {
    fn iter(&self) -> impl Iterator<Item = &SongHandle> {
        self.order.iter().filter_map(|id| self.songs.get(id))
    }

    fn find_duplicate(&self, metadata: &SongMetadata, except: Option<Uuid>) -> Option<Song> {
        self.iter()
            .filter(|s| Some(s.id()) != except)
            .map(|s| s.snapshot())
            .find(|s| s.same_song(&metadata.artist, &metadata.title))
    }

    fn insert(&mut self, song: Song) -> bool {
        if self.songs.contains_key(&song.id) {
            return false;
        }
        self.order.push(song.id);
        self.songs.insert(song.id, SongRecord::new(song));
        true
    }
}

/// Catalogue des morceaux, indexé par identifiant
///
/// Le clone est peu coûteux et partage le même stockage.
#[derive(Clone, Default)]
pub struct SongCatalog {
    inner: Arc<RwLock<CatalogInner>>,
}

impl SongCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.songs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Tous les morceaux, dans l'ordre d'insertion
    pub async fn get_all(&self) -> Vec<Song> {
        self.inner.read().await.iter().map(|s| s.snapshot()).collect()
    }

    /// Morceaux vérifiant le prédicat
    pub async fn find<P>(&self, predicate: P) -> Vec<Song>
    where
        P: Fn(&Song) -> bool,
    {
        self.inner
            .read()
            .await
            .iter()
            .map(|s| s.snapshot())
            .filter(|s| predicate(s))
            .collect()
    }

    /// Premier morceau vérifiant le prédicat
    pub async fn find_one<P>(&self, predicate: P) -> Option<Song>
    where
        P: Fn(&Song) -> bool,
    {
        self.inner
            .read()
            .await
            .iter()
            .map(|s| s.snapshot())
            .find(|s| predicate(s))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Option<Song> {
        self.inner.read().await.songs.get(&id).map(|s| s.snapshot())
    }

    /// Référence partagée vers un morceau, pour les entrées de playlist
    pub async fn handle(&self, id: Uuid) -> Option<SongHandle> {
        self.inner.read().await.songs.get(&id).cloned()
    }

    /// Résout une liste d'identifiants dans l'ordre demandé
    ///
    /// Un même identifiant peut apparaître plusieurs fois. Le premier
    /// identifiant inconnu fait échouer l'ensemble.
    pub async fn resolve_many(&self, ids: &[Uuid]) -> Result<Vec<SongHandle>> {
        let inner = self.inner.read().await;
        ids.iter()
            .map(|id| {
                inner
                    .songs
                    .get(id)
                    .cloned()
                    .ok_or(Error::SongNotFound(*id))
            })
            .collect()
    }

    /// Ajoute un morceau tel quel ; `false` si l'identifiant existe déjà
    ///
    /// Aucune vérification d'unicité artiste/titre n'est faite ici.
    pub async fn create(&self, song: Song) -> bool {
        self.inner.write().await.insert(song)
    }

    /// Remplace les attributs d'un morceau ; `false` s'il n'existe pas
    pub async fn update(&self, song: Song) -> bool {
        let inner = self.inner.read().await;
        match inner.songs.get(&song.id) {
            Some(record) => {
                record.replace(song.metadata());
                true
            }
            None => false,
        }
    }

    /// Retire un morceau ; indique s'il était présent
    ///
    /// Les entrées de playlist qui le référencent gardent ses dernières valeurs.
    pub async fn delete(&self, id: Uuid) -> bool {
        let mut inner = self.inner.write().await;
        if inner.songs.remove(&id).is_some() {
            inner.order.retain(|k| *k != id);
            debug!(song_id = %id, "Song deleted");
            true
        } else {
            false
        }
    }

    /// Recherche par sous-chaîne sur l'artiste ou le titre, sans tenir compte de la casse
    ///
    /// Un terme vide retourne tout le catalogue.
    pub async fn search(&self, term: Option<&str>) -> Vec<Song> {
        let term = term.map(str::trim).unwrap_or_default().to_lowercase();
        if term.is_empty() {
            return self.get_all().await;
        }
        self.find(|s| {
            s.artist.to_lowercase().contains(&term) || s.title.to_lowercase().contains(&term)
        })
        .await
    }

    /// Crée un morceau si aucun autre ne porte le même artiste et titre
    ///
    /// La recherche de doublon et l'insertion se font sous le même verrou.
    pub async fn create_song(&self, metadata: SongMetadata) -> Result<Song> {
        let mut inner = self.inner.write().await;
        if inner.find_duplicate(&metadata, None).is_some() {
            return Err(Error::SongAlreadyExists {
                artist: metadata.artist,
                title: metadata.title,
            });
        }

        let song = Song::new(metadata);
        inner.insert(song.clone());
        info!(song_id = %song.id, artist = %song.artist, title = %song.title, "Song created");
        Ok(song)
    }

    /// Modifie un morceau existant en gardant l'unicité artiste/titre
    pub async fn update_song(&self, id: Uuid, metadata: SongMetadata) -> Result<Song> {
        let inner = self.inner.write().await;
        let record = inner.songs.get(&id).ok_or(Error::SongNotFound(id))?;

        if inner.find_duplicate(&metadata, Some(id)).is_some() {
            return Err(Error::SongAlreadyExists {
                artist: metadata.artist,
                title: metadata.title,
            });
        }

        record.replace(metadata);
        debug!(song_id = %id, "Song updated");
        Ok(record.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn catalog_with(songs: &[(&str, &str)]) -> (SongCatalog, Vec<Song>) {
        let catalog = SongCatalog::new();
        let mut created = Vec::new();
        for (artist, title) in songs {
            created.push(
                catalog
                    .create_song(SongMetadata::new(*artist, *title))
                    .await
                    .unwrap(),
            );
        }
        (catalog, created)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (catalog, songs) = catalog_with(&[("Abc", "Xyz"), ("Def", "Uvw")]).await;

        assert_eq!(catalog.len().await, 2);
        assert_eq!(catalog.get_by_id(songs[0].id).await, Some(songs[0].clone()));
        assert_eq!(catalog.get_all().await, songs);
        assert_eq!(catalog.get_by_id(Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn test_raw_create_rejects_existing_id() {
        let (catalog, songs) = catalog_with(&[("Abc", "Xyz")]).await;
        assert!(!catalog.create(songs[0].clone()).await);
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_is_rejected_before_create() {
        let catalog = SongCatalog::new();
        catalog
            .create_song(SongMetadata::new("Abc", "Xyz"))
            .await
            .unwrap();

        // Le motif find_one puis create, tel qu'un appelant l'écrirait
        let existing = catalog.find_one(|s| s.same_song("Abc", "Xyz")).await;
        assert!(existing.is_some());

        let err = catalog
            .create_song(SongMetadata::new("abc", "XYZ"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SongAlreadyExists { .. }));
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_song() {
        let (catalog, songs) = catalog_with(&[("Abc", "Xyz"), ("Def", "Uvw")]).await;

        // Même morceau, changement de casse seulement : pas un doublon de lui-même
        let updated = catalog
            .update_song(songs[0].id, SongMetadata::new("ABC", "Xyz"))
            .await
            .unwrap();
        assert_eq!(updated.artist, "ABC");

        let err = catalog
            .update_song(songs[0].id, SongMetadata::new("def", "uvw"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SongAlreadyExists { .. }));

        let err = catalog
            .update_song(Uuid::new_v4(), SongMetadata::new("x", "y"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SongNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_is_visible_through_handles() {
        let (catalog, songs) = catalog_with(&[("Abc", "Xyz")]).await;
        let handle = catalog.handle(songs[0].id).await.unwrap();

        assert!(
            catalog
                .update(Song::with_id(songs[0].id, SongMetadata::new("New", "Name")))
                .await
        );
        assert_eq!(handle.metadata(), SongMetadata::new("New", "Name"));
    }

    #[tokio::test]
    async fn test_delete() {
        let (catalog, songs) = catalog_with(&[("Abc", "Xyz")]).await;
        let handle = catalog.handle(songs[0].id).await.unwrap();

        assert!(catalog.delete(songs[0].id).await);
        assert!(!catalog.delete(songs[0].id).await);
        assert!(catalog.is_empty().await);
        // La référence garde les dernières valeurs connues
        assert_eq!(handle.snapshot(), songs[0]);
    }

    #[tokio::test]
    async fn test_search() {
        let (catalog, _) =
            catalog_with(&[("Daft Punk", "One More Time"), ("Queen", "Bohemian Rhapsody")]).await;

        assert_eq!(catalog.search(Some("punk")).await.len(), 1);
        assert_eq!(catalog.search(Some("RHAPSODY")).await[0].artist, "Queen");
        assert_eq!(catalog.search(Some("  ")).await.len(), 2);
        assert_eq!(catalog.search(None).await.len(), 2);
        assert!(catalog.search(Some("zzz")).await.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_many_keeps_order_and_duplicates() {
        let (catalog, songs) = catalog_with(&[("A", "1"), ("B", "2")]).await;

        let ids = [songs[1].id, songs[0].id, songs[1].id];
        let handles = catalog.resolve_many(&ids).await.unwrap();
        let resolved: Vec<Uuid> = handles.iter().map(|h| h.id()).collect();
        assert_eq!(resolved, ids);

        let missing = Uuid::new_v4();
        let err = catalog
            .resolve_many(&[songs[0].id, missing])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SongNotFound(id) if id == missing));
    }
}
