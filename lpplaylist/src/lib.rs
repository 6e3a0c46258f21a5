//! # lpplaylist - Playlists vivantes de LivePlaylist
//!
//! Cette crate fournit le coeur du service :
//! - **PlaylistCore** : séquence ordonnée d'entrées, bornée, avec éviction FIFO
//! - **PlaylistDirectory** : stockage des playlists, un verrou par playlist
//! - **WriteHandle** : mutations atomiques des entrées (ajout, insertion,
//!   déplacement, retrait, vidage)
//! - **guard** : contrôle du propriétaire, insensible à la casse
//! - **événements** : chaque modification est diffusée sur un canal broadcast
//!
//! Avec la feature `lpserver` (active par défaut), la crate expose aussi l'API
//! REST `/api/playlists` et son flux SSE `/api/playlists/events`.
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use lpcatalog::{SongCatalog, SongMetadata};
//! use lpplaylist::{PlaylistDirectory, PlaylistMetadata};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let songs = SongCatalog::new();
//! let song = songs.create_song(SongMetadata::new("Daft Punk", "One More Time")).await?;
//!
//! let playlists = PlaylistDirectory::default();
//! let playlist = playlists
//!     .create_new(PlaylistMetadata::new("alice", "Friday night", ""))
//!     .await?;
//!
//! let writer = playlists.write_handle(playlist.id).await?.on_behalf_of("alice");
//! let entries = writer.append(songs.resolve_many(&[song.id, song.id]).await?).await?;
//! assert_eq!(entries.len(), 2);
//! # Ok(())
//! # }
//! ```

mod directory;
mod error;
mod events;
pub mod guard;
mod handle;
mod playlist;

#[cfg(feature = "lpconfig")]
mod config_ext;

#[cfg(feature = "lpserver")]
pub mod api;
#[cfg(feature = "lpserver")]
pub mod openapi;
#[cfg(feature = "lpserver")]
mod server_ext;
#[cfg(feature = "lpserver")]
pub mod sse;

// Réexports publics
pub use directory::PlaylistDirectory;
pub use error::{Error, Result};
pub use events::{PlaylistEvent, PlaylistEventEnvelope, PlaylistEventKind};
pub use handle::WriteHandle;
pub use playlist::core::{MAX_ENTRIES, PlaylistConfig, PlaylistCore};
pub use playlist::entry::{PlaylistEntry, PlaylistEntryView};
pub use playlist::{Playlist, PlaylistMetadata, PlaylistSnapshot};

#[cfg(feature = "lpconfig")]
pub use config_ext::PlaylistConfigExt;
#[cfg(feature = "lpserver")]
pub use server_ext::PlaylistServerExt;
