use lpcatalog::{CatalogServerExt, SongCatalog, UserDirectory, seed::seed_songs};
use lpconfig::get_config;
use lpplaylist::{PlaylistConfigExt, PlaylistDirectory, PlaylistServerExt};
use lpserver::ServerBuilder;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_config();

    // ========== PHASE 1 : Serveur et logs ==========
    let mut server = ServerBuilder::new_configured().build();
    server.init_logging().await;

    server
        .add_route("/info", || async {
            serde_json::json!({ "name": "LivePlaylist", "version": env!("CARGO_PKG_VERSION") })
        })
        .await;

    // ========== PHASE 2 : Stockages ==========
    let songs = SongCatalog::new();
    let users = UserDirectory::with_admin(&config.get_admin_username()).await;
    let playlists = PlaylistDirectory::new(config.playlist_config());

    match config.get_songs_seed_file() {
        Some(path) => match seed_songs(&songs, &path).await {
            Ok(count) => info!(count, path = %path.display(), "Song catalog seeded"),
            Err(e) => warn!("Cannot seed song catalog from {}: {:#}", path.display(), e),
        },
        None => info!("No song seed file configured"),
    }

    info!(
        max_entries = playlists.config().max_entries,
        "Playlist directory ready"
    );

    server
        .init_catalog_api(songs.clone(), users.clone())
        .await?;
    server.init_playlist_api(playlists, songs, users).await?;

    // ========== PHASE 3 : Démarrage du serveur ==========
    info!("Starting HTTP server...");
    server.start().await?;

    info!("LivePlaylist is ready, press Ctrl+C to stop");
    server.wait().await;

    Ok(())
}
