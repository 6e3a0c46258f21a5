//! Extension pour monter les API du catalogue sur lpserver

use anyhow::Result;
use lpserver::Server;
use utoipa::OpenApi;

use crate::api::{CatalogApiState, SONGS_API, USERS_API, songs_api_router, users_api_router};
use crate::openapi::{SongsApiDoc, UsersApiDoc};
use crate::{SongCatalog, UserDirectory};

/// Trait d'extension pour ajouter les API morceaux et utilisateurs au serveur
pub trait CatalogServerExt {
    /// Enregistre les routes HTTP du catalogue
    ///
    /// # Routes enregistrées
    ///
    /// - `GET|POST /api/songs`, `GET|PUT|DELETE /api/songs/{id}`
    /// - `GET|POST /api/users`, `GET|DELETE /api/users/{username}`
    /// - `GET /swagger-ui/songs` et `GET /swagger-ui/users`
    async fn init_catalog_api(&mut self, songs: SongCatalog, users: UserDirectory) -> Result<()>;
}

impl CatalogServerExt for Server {
    async fn init_catalog_api(&mut self, songs: SongCatalog, users: UserDirectory) -> Result<()> {
        let state = CatalogApiState { songs, users };

        self.add_openapi(songs_api_router(state.clone()), SongsApiDoc::openapi(), SONGS_API)
            .await;
        self.add_openapi(users_api_router(state), UsersApiDoc::openapi(), USERS_API)
            .await;

        tracing::info!("Catalog API registered");
        Ok(())
    }
}
