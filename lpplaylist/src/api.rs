//! API REST pour la gestion des playlists et de leurs entrées.
//!
//! Les mutations suivent toujours le même ordre : authentification (401),
//! validation du corps (400), résolution de la playlist (404), contrôle du
//! propriétaire (403), résolution des morceaux (404), puis mutation.

use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::{FromRef, Path, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use lpcatalog::{AuthenticatedUser, SongCatalog, UserDirectory};
use lpserver::validation::require_non_empty;
use lpserver::{ErrorResponse, Validate, ValidatedJson};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::directory::PlaylistDirectory;
use crate::error::{Error, Result};
use crate::guard;
use crate::handle::WriteHandle;
use crate::playlist::entry::PlaylistEntryView;
use crate::playlist::{PlaylistMetadata, PlaylistSnapshot};
use crate::sse::playlist_events_sse;

/// Nom de l'API, servie sous `/api/playlists`
pub const PLAYLISTS_API: &str = "playlists";

/// État partagé par les handlers playlist
#[derive(Clone)]
pub struct PlaylistApiState {
    pub playlists: PlaylistDirectory,
    pub songs: SongCatalog,
    pub users: UserDirectory,
}

impl FromRef<PlaylistApiState> for PlaylistDirectory {
    fn from_ref(state: &PlaylistApiState) -> Self {
        state.playlists.clone()
    }
}

impl FromRef<PlaylistApiState> for SongCatalog {
    fn from_ref(state: &PlaylistApiState) -> Self {
        state.songs.clone()
    }
}

impl FromRef<PlaylistApiState> for UserDirectory {
    fn from_ref(state: &PlaylistApiState) -> Self {
        state.users.clone()
    }
}

/// Router `/api/playlists` combinant les différents endpoints REST.
pub fn playlist_api_router(state: PlaylistApiState) -> Router {
    Router::new()
        .route("/", get(list_playlists).post(create_playlist))
        .route("/events", get(playlist_events_sse))
        .route(
            "/{playlist_id}",
            get(get_playlist)
                .put(update_playlist)
                .delete(delete_playlist),
        )
        .route("/{playlist_id}/songs", get(get_playlist_songs))
        .route("/{playlist_id}/add-songs", post(add_songs))
        .route("/{playlist_id}/move-song", post(move_song))
        .route("/{playlist_id}/remove-songs", post(remove_songs))
        .route("/{playlist_id}/clear", post(clear_playlist))
        .with_state(state)
}

/// Résumé d'une playlist (utilisé dans les listings).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummaryResponse {
    pub id: Uuid,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub entry_count: usize,
    pub last_change: DateTime<Utc>,
}

/// Réponse détaillée pour une playlist (inclut les entrées).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetailResponse {
    #[serde(flatten)]
    #[schema(inline)]
    pub summary: PlaylistSummaryResponse,
    pub entries: Vec<PlaylistEntryView>,
}

impl From<&PlaylistSnapshot> for PlaylistSummaryResponse {
    fn from(snapshot: &PlaylistSnapshot) -> Self {
        Self {
            id: snapshot.id,
            owner: snapshot.metadata.owner.clone(),
            name: snapshot.metadata.name.clone(),
            description: snapshot.metadata.description.clone(),
            entry_count: snapshot.entries.len(),
            last_change: snapshot.last_change,
        }
    }
}

impl From<PlaylistSnapshot> for PlaylistDetailResponse {
    fn from(snapshot: PlaylistSnapshot) -> Self {
        Self {
            summary: PlaylistSummaryResponse::from(&snapshot),
            entries: snapshot.entries,
        }
    }
}

/// Requête de création ou de remplacement d'une playlist.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRequest {
    #[schema(example = "Friday night")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Requête d'ajout de morceaux ; sans `index`, les morceaux vont en fin.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSongsRequest {
    #[schema(example = 0)]
    pub index: Option<i64>,
    pub song_ids: Vec<Uuid>,
}

/// Requête de déplacement d'une entrée.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveSongRequest {
    pub entry_id: Uuid,
    pub index: i64,
}

/// Requête de retrait d'entrées.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSongsRequest {
    pub entry_ids: Vec<Uuid>,
}

fn require_non_negative(errors: &mut Vec<String>, field: &str, value: i64) {
    if value < 0 {
        errors.push(format!("'{}' must be greater than or equal to 0", field));
    }
}

impl Validate for PlaylistRequest {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "name", &self.name);
        errors
    }
}

impl Validate for AddSongsRequest {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.song_ids.is_empty() {
            errors.push("'songIds' must not be empty".to_string());
        }
        if let Some(index) = self.index {
            require_non_negative(&mut errors, "index", index);
        }
        errors
    }
}

impl Validate for MoveSongRequest {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_non_negative(&mut errors, "index", self.index);
        errors
    }
}

impl Validate for RemoveSongsRequest {
    fn validate(&self) -> Vec<String> {
        if self.entry_ids.is_empty() {
            vec!["'entryIds' must not be empty".to_string()]
        } else {
            Vec::new()
        }
    }
}

// Index validé >= 0 ; au-delà de usize, le moteur borne de toute façon.
fn to_index(index: i64) -> usize {
    usize::try_from(index).unwrap_or(usize::MAX)
}

/// Résout la playlist puis vérifie que l'appelant en est le propriétaire
async fn owned_playlist(
    playlists: &PlaylistDirectory,
    playlist_id: Uuid,
    caller: &str,
) -> Result<WriteHandle> {
    let handle = playlists.write_handle(playlist_id).await?;
    let owner = handle.owner().await;
    guard::authorize(playlist_id, &owner, Some(caller))?;
    Ok(handle.on_behalf_of(caller))
}

fn entries_response(result: Result<Vec<PlaylistEntryView>>) -> Response {
    match result {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/playlists",
    tag = "playlists",
    responses(
        (status = 200, description = "Liste de toutes les playlists", body = [PlaylistSummaryResponse])
    )
)]
pub async fn list_playlists(State(playlists): State<PlaylistDirectory>) -> Response {
    let payload: Vec<PlaylistSummaryResponse> = playlists
        .get_all()
        .await
        .iter()
        .map(PlaylistSummaryResponse::from)
        .collect();
    (StatusCode::OK, Json(payload)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/playlists/{playlist_id}",
    tag = "playlists",
    params(("playlist_id" = Uuid, Path, description = "Identifiant de la playlist")),
    responses(
        (status = 200, description = "Playlist et ses entrées", body = PlaylistDetailResponse),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    )
)]
pub async fn get_playlist(
    State(playlists): State<PlaylistDirectory>,
    Path(playlist_id): Path<Uuid>,
) -> Response {
    match playlists.get_by_id(playlist_id).await {
        Some(snapshot) => {
            (StatusCode::OK, Json(PlaylistDetailResponse::from(snapshot))).into_response()
        }
        None => map_error(Error::PlaylistNotFound(playlist_id)),
    }
}

#[utoipa::path(
    get,
    path = "/api/playlists/{playlist_id}/songs",
    tag = "playlists",
    params(("playlist_id" = Uuid, Path, description = "Identifiant de la playlist")),
    responses(
        (status = 200, description = "Entrées de la playlist, dans l'ordre", body = [PlaylistEntryView]),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    )
)]
pub async fn get_playlist_songs(
    State(playlists): State<PlaylistDirectory>,
    Path(playlist_id): Path<Uuid>,
) -> Response {
    match playlists.get_by_id(playlist_id).await {
        Some(snapshot) => (StatusCode::OK, Json(snapshot.entries)).into_response(),
        None => map_error(Error::PlaylistNotFound(playlist_id)),
    }
}

#[utoipa::path(
    post,
    path = "/api/playlists",
    tag = "playlists",
    request_body = PlaylistRequest,
    responses(
        (status = 201, description = "Playlist créée", body = PlaylistDetailResponse),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 401, description = "Authentification requise", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn create_playlist(
    State(playlists): State<PlaylistDirectory>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<PlaylistRequest>,
) -> Response {
    let metadata = PlaylistMetadata::new(caller, req.name, req.description);
    match playlists.create_new(metadata).await {
        Ok(snapshot) => {
            let location = format!("/api/{}/{}", PLAYLISTS_API, snapshot.id);
            (
                StatusCode::CREATED,
                [(LOCATION, location)],
                Json(PlaylistDetailResponse::from(snapshot)),
            )
                .into_response()
        }
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    put,
    path = "/api/playlists/{playlist_id}",
    tag = "playlists",
    params(("playlist_id" = Uuid, Path, description = "Identifiant de la playlist")),
    request_body = PlaylistRequest,
    responses(
        (status = 200, description = "Playlist modifiée", body = PlaylistDetailResponse),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 401, description = "Authentification requise", body = ErrorResponse),
        (status = 403, description = "L'appelant n'est pas le propriétaire", body = ErrorResponse),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn update_playlist(
    State(playlists): State<PlaylistDirectory>,
    Path(playlist_id): Path<Uuid>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<PlaylistRequest>,
) -> Response {
    let result = async {
        let handle = owned_playlist(&playlists, playlist_id, &caller).await?;
        // Le propriétaire n'est jamais transféré par une mise à jour
        let metadata = PlaylistMetadata::new(handle.owner().await, req.name, req.description);
        if !playlists.update(playlist_id, metadata).await {
            return Err(Error::PlaylistNotFound(playlist_id));
        }
        playlists
            .get_by_id(playlist_id)
            .await
            .ok_or(Error::PlaylistNotFound(playlist_id))
    }
    .await;

    match result {
        Ok(snapshot) => {
            (StatusCode::OK, Json(PlaylistDetailResponse::from(snapshot))).into_response()
        }
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/playlists/{playlist_id}",
    tag = "playlists",
    params(("playlist_id" = Uuid, Path, description = "Identifiant de la playlist")),
    responses(
        (status = 204, description = "Playlist supprimée"),
        (status = 401, description = "Authentification requise", body = ErrorResponse),
        (status = 403, description = "L'appelant n'est pas le propriétaire", body = ErrorResponse),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn delete_playlist(
    State(playlists): State<PlaylistDirectory>,
    Path(playlist_id): Path<Uuid>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Response {
    let result = async {
        owned_playlist(&playlists, playlist_id, &caller).await?;
        if playlists.delete(playlist_id).await {
            Ok(())
        } else {
            Err(Error::PlaylistNotFound(playlist_id))
        }
    }
    .await;

    match result {
        Ok(()) => {
            info!(caller = %caller, playlist_id = %playlist_id, "Playlist removed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/playlists/{playlist_id}/add-songs",
    tag = "playlists",
    params(("playlist_id" = Uuid, Path, description = "Identifiant de la playlist")),
    request_body = AddSongsRequest,
    responses(
        (status = 200, description = "Entrées après ajout", body = [PlaylistEntryView]),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 401, description = "Authentification requise", body = ErrorResponse),
        (status = 403, description = "L'appelant n'est pas le propriétaire", body = ErrorResponse),
        (status = 404, description = "Playlist ou morceau introuvable", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn add_songs(
    State(state): State<PlaylistApiState>,
    Path(playlist_id): Path<Uuid>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<AddSongsRequest>,
) -> Response {
    let result = async {
        let handle = owned_playlist(&state.playlists, playlist_id, &caller).await?;
        let songs = state.songs.resolve_many(&req.song_ids).await?;
        match req.index {
            Some(index) => handle.insert(to_index(index), songs).await,
            None => handle.append(songs).await,
        }
    }
    .await;

    entries_response(result)
}

#[utoipa::path(
    post,
    path = "/api/playlists/{playlist_id}/move-song",
    tag = "playlists",
    params(("playlist_id" = Uuid, Path, description = "Identifiant de la playlist")),
    request_body = MoveSongRequest,
    responses(
        (status = 200, description = "Entrées après déplacement", body = [PlaylistEntryView]),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 401, description = "Authentification requise", body = ErrorResponse),
        (status = 403, description = "L'appelant n'est pas le propriétaire", body = ErrorResponse),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn move_song(
    State(playlists): State<PlaylistDirectory>,
    Path(playlist_id): Path<Uuid>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<MoveSongRequest>,
) -> Response {
    let result = async {
        let handle = owned_playlist(&playlists, playlist_id, &caller).await?;
        handle.move_entry(req.entry_id, to_index(req.index)).await
    }
    .await;

    entries_response(result)
}

#[utoipa::path(
    post,
    path = "/api/playlists/{playlist_id}/remove-songs",
    tag = "playlists",
    params(("playlist_id" = Uuid, Path, description = "Identifiant de la playlist")),
    request_body = RemoveSongsRequest,
    responses(
        (status = 200, description = "Entrées après retrait", body = [PlaylistEntryView]),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 401, description = "Authentification requise", body = ErrorResponse),
        (status = 403, description = "L'appelant n'est pas le propriétaire", body = ErrorResponse),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn remove_songs(
    State(playlists): State<PlaylistDirectory>,
    Path(playlist_id): Path<Uuid>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ValidatedJson(req): ValidatedJson<RemoveSongsRequest>,
) -> Response {
    let result = async {
        let handle = owned_playlist(&playlists, playlist_id, &caller).await?;
        let entry_ids: HashSet<Uuid> = req.entry_ids.into_iter().collect();
        handle.remove_many(&entry_ids).await
    }
    .await;

    entries_response(result)
}

#[utoipa::path(
    post,
    path = "/api/playlists/{playlist_id}/clear",
    tag = "playlists",
    params(("playlist_id" = Uuid, Path, description = "Identifiant de la playlist")),
    responses(
        (status = 200, description = "Playlist vidée", body = [PlaylistEntryView]),
        (status = 401, description = "Authentification requise", body = ErrorResponse),
        (status = 403, description = "L'appelant n'est pas le propriétaire", body = ErrorResponse),
        (status = 404, description = "Playlist introuvable", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn clear_playlist(
    State(playlists): State<PlaylistDirectory>,
    Path(playlist_id): Path<Uuid>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Response {
    let result = async {
        let handle = owned_playlist(&playlists, playlist_id, &caller).await?;
        handle.clear().await
    }
    .await;

    entries_response(result)
}

impl Error {
    /// Code d'erreur stable exposé dans les réponses
    pub fn code(&self) -> &'static str {
        match self {
            Error::PlaylistNotFound(_) => "PLAYLIST_NOT_FOUND",
            Error::PlaylistAlreadyExists(_) => "PLAYLIST_ALREADY_EXISTS",
            Error::Forbidden { .. } => "FORBIDDEN",
            Error::Unauthenticated => "UNAUTHENTICATED",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Catalog(err) => err.code(),
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::PlaylistNotFound(_) => StatusCode::NOT_FOUND,
            Error::PlaylistAlreadyExists(_) => StatusCode::CONFLICT,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Catalog(err) => err.status(),
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Traduit une erreur playlist en réponse HTTP
pub fn map_error(error: Error) -> Response {
    let status = error.status();
    if status.is_server_error() {
        tracing::error!("Playlist request failed: {:#}", error);
    }
    (status, Json(ErrorResponse::new(error.code(), error.to_string()))).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        map_error(self)
    }
}
