//! Extension de lpconfig pour les playlists

use crate::playlist::core::{MAX_ENTRIES, PlaylistConfig};

/// Trait d'extension pour lpconfig::Config
pub trait PlaylistConfigExt {
    /// Configuration appliquée à chaque nouvelle playlist
    fn playlist_config(&self) -> PlaylistConfig;
}

impl PlaylistConfigExt for lpconfig::Config {
    fn playlist_config(&self) -> PlaylistConfig {
        PlaylistConfig {
            max_entries: self.get_playlist_max_entries().unwrap_or(MAX_ENTRIES),
        }
    }
}
