//! Types d'erreurs pour lpplaylist

use uuid::Uuid;

/// Erreurs de gestion de playlist
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(Uuid),

    #[error("Playlist already exists: {0}")]
    PlaylistAlreadyExists(Uuid),

    #[error("User '{caller}' is not the owner of playlist {playlist_id}")]
    Forbidden { playlist_id: Uuid, caller: String },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Catalog(#[from] lpcatalog::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour lpplaylist
pub type Result<T> = std::result::Result<T, Error>;
