//! # lpcatalog - Catalogue de morceaux et annuaire des utilisateurs
//!
//! Cette crate fournit les deux stockages simples de LivePlaylist :
//! - **SongCatalog** : morceaux indexés par identifiant, unicité artiste/titre
//! - **UserDirectory** : utilisateurs indexés par nom, insensible à la casse
//! - **auth** : identification de l'appelant par `Authorization: User <nom>`
//! - **seed** : chargement initial des morceaux depuis un fichier CSV
//!
//! Avec la feature `lpserver` (active par défaut), la crate expose aussi les
//! API REST `/api/songs` et `/api/users` et les extracteurs d'identité Axum.
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use lpcatalog::{SongCatalog, SongMetadata};
//!
//! # #[tokio::main]
//! # async fn main() -> lpcatalog::Result<()> {
//! let catalog = SongCatalog::new();
//! let song = catalog.create_song(SongMetadata::new("Daft Punk", "One More Time")).await?;
//!
//! // Un doublon (même artiste et titre, casse ignorée) est refusé
//! assert!(catalog.create_song(SongMetadata::new("daft punk", "one more time")).await.is_err());
//! # let _ = song;
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod catalog;
mod error;
pub mod seed;
mod song;
mod users;

#[cfg(feature = "lpserver")]
pub mod api;
#[cfg(feature = "lpserver")]
pub mod openapi;
#[cfg(feature = "lpserver")]
mod server_ext;

// Réexports publics
pub use catalog::SongCatalog;
pub use error::{Error, Result};
pub use song::{Song, SongHandle, SongMetadata, SongRecord};
pub use users::{User, UserDirectory, is_valid_username};

#[cfg(feature = "lpserver")]
pub use auth::{AuthenticatedUser, CallerIdentity};
#[cfg(feature = "lpserver")]
pub use server_ext::CatalogServerExt;
