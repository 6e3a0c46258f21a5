//! Extension pour monter l'API playlists sur lpserver

use anyhow::Result;
use lpcatalog::{SongCatalog, UserDirectory};
use lpserver::Server;
use utoipa::OpenApi;

use crate::api::{PLAYLISTS_API, PlaylistApiState, playlist_api_router};
use crate::directory::PlaylistDirectory;
use crate::openapi::PlaylistsApiDoc;

/// Trait d'extension pour ajouter l'API playlists au serveur
pub trait PlaylistServerExt {
    /// Enregistre les routes HTTP des playlists
    ///
    /// # Routes enregistrées
    ///
    /// - `GET|POST /api/playlists`
    /// - `GET|PUT|DELETE /api/playlists/{id}`
    /// - `GET /api/playlists/{id}/songs`
    /// - `POST /api/playlists/{id}/add-songs|move-song|remove-songs|clear`
    /// - `GET /api/playlists/events` (SSE)
    /// - `GET /swagger-ui/playlists`
    async fn init_playlist_api(
        &mut self,
        playlists: PlaylistDirectory,
        songs: SongCatalog,
        users: UserDirectory,
    ) -> Result<()>;
}

impl PlaylistServerExt for Server {
    async fn init_playlist_api(
        &mut self,
        playlists: PlaylistDirectory,
        songs: SongCatalog,
        users: UserDirectory,
    ) -> Result<()> {
        let state = PlaylistApiState {
            playlists,
            songs,
            users,
        };

        self.add_openapi(
            playlist_api_router(state),
            PlaylistsApiDoc::openapi(),
            PLAYLISTS_API,
        )
        .await;

        tracing::info!("Playlist API registered");
        Ok(())
    }
}
