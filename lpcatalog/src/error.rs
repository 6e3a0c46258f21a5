//! Types d'erreurs pour lpcatalog

use uuid::Uuid;

/// Erreurs du catalogue de morceaux et de l'annuaire des utilisateurs
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Song not found: {0}")]
    SongNotFound(Uuid),

    #[error("A song by '{artist}' titled '{title}' already exists")]
    SongAlreadyExists { artist: String, title: String },

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour lpcatalog
pub type Result<T> = std::result::Result<T, Error>;
