//! Documentation OpenAPI pour l'API playlists.

use lpcatalog::openapi::UserAuthAddon;
use utoipa::OpenApi;

/// Documentation OpenAPI de l'API de gestion des playlists.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::list_playlists,
        crate::api::create_playlist,
        crate::api::get_playlist,
        crate::api::update_playlist,
        crate::api::delete_playlist,
        crate::api::get_playlist_songs,
        crate::api::add_songs,
        crate::api::move_song,
        crate::api::remove_songs,
        crate::api::clear_playlist,
        crate::sse::playlist_events_sse,
    ),
    components(
        schemas(
            crate::api::PlaylistSummaryResponse,
            crate::api::PlaylistDetailResponse,
            crate::api::PlaylistRequest,
            crate::api::AddSongsRequest,
            crate::api::MoveSongRequest,
            crate::api::RemoveSongsRequest,
            crate::playlist::entry::PlaylistEntryView,
            crate::sse::EventPayload,
            lpserver::ErrorResponse,
        )
    ),
    modifiers(&UserAuthAddon),
    tags(
        (name = "playlists", description = "Gestion des playlists et de leurs entrées")
    ),
    info(
        title = "LivePlaylist Playlists API",
        version = "0.1.0",
        description = r#"
# API de gestion des playlists

Une playlist est une séquence ordonnée d'entrées, chacune référençant un morceau
du catalogue. Un même morceau peut apparaître plusieurs fois.

## Capacité

Une playlist contient au plus 200 entrées (configurable via `playlists.max_entries`).
Au-delà, les entrées en tête de playlist sont évincées, y compris celles qui
viennent d'être insérées en tête.

## Tolérance

- un index au-delà de la fin est ramené à la fin
- déplacer ou retirer une entrée inconnue ne change rien et répond 200

## Droits

La lecture est libre ; toute modification demande `Authorization: User <nom>`
et n'est permise qu'au propriétaire (comparaison insensible à la casse).
        "#,
    )
)]
pub struct PlaylistsApiDoc;
