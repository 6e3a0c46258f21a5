//! API REST du catalogue de morceaux et de l'annuaire des utilisateurs.

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::get,
};
use lpserver::validation::require_non_empty;
use lpserver::{ErrorResponse, Validate, ValidatedJson};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::catalog::SongCatalog;
use crate::error::Error;
use crate::song::{Song, SongMetadata};
use crate::users::{User, UserDirectory, is_valid_username};

/// Nom de l'API des morceaux, servie sous `/api/songs`
pub const SONGS_API: &str = "songs";
/// Nom de l'API des utilisateurs, servie sous `/api/users`
pub const USERS_API: &str = "users";

/// État partagé par les handlers du catalogue
#[derive(Clone)]
pub struct CatalogApiState {
    pub songs: SongCatalog,
    pub users: UserDirectory,
}

impl FromRef<CatalogApiState> for UserDirectory {
    fn from_ref(state: &CatalogApiState) -> Self {
        state.users.clone()
    }
}

impl FromRef<CatalogApiState> for SongCatalog {
    fn from_ref(state: &CatalogApiState) -> Self {
        state.songs.clone()
    }
}

/// Router `/api/songs`
pub fn songs_api_router(state: CatalogApiState) -> Router {
    Router::new()
        .route("/", get(search_songs).post(create_song))
        .route("/{id}", get(get_song).put(update_song).delete(delete_song))
        .with_state(state)
}

/// Router `/api/users`
pub fn users_api_router(state: CatalogApiState) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{username}", get(get_user).delete(delete_user))
        .with_state(state)
}

impl Validate for SongMetadata {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_non_empty(&mut errors, "artist", &self.artist);
        require_non_empty(&mut errors, "title", &self.title);
        errors
    }
}

impl Validate for User {
    fn validate(&self) -> Vec<String> {
        self.violations()
    }
}

/// Paramètres de recherche de morceaux
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Sous-chaîne cherchée dans l'artiste ou le titre
    pub search_term: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/songs",
    tag = "songs",
    params(SearchQuery),
    responses(
        (status = 200, description = "Morceaux correspondant à la recherche", body = [Song])
    )
)]
pub async fn search_songs(
    State(songs): State<SongCatalog>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let found = songs.search(query.search_term.as_deref()).await;
    (StatusCode::OK, Json(found)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/songs/{id}",
    tag = "songs",
    params(("id" = Uuid, Path, description = "Identifiant du morceau")),
    responses(
        (status = 200, description = "Morceau", body = Song),
        (status = 404, description = "Morceau introuvable", body = ErrorResponse)
    )
)]
pub async fn get_song(State(songs): State<SongCatalog>, Path(id): Path<Uuid>) -> Response {
    match songs.get_by_id(id).await {
        Some(song) => (StatusCode::OK, Json(song)).into_response(),
        None => map_error(Error::SongNotFound(id)),
    }
}

#[utoipa::path(
    post,
    path = "/api/songs",
    tag = "songs",
    request_body = SongMetadata,
    responses(
        (status = 201, description = "Morceau créé", body = Song),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 401, description = "Authentification requise", body = ErrorResponse),
        (status = 409, description = "Morceau déjà existant", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn create_song(
    State(songs): State<SongCatalog>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ValidatedJson(metadata): ValidatedJson<SongMetadata>,
) -> Response {
    match songs.create_song(metadata).await {
        Ok(song) => {
            info!(caller = %caller, song_id = %song.id, "Song added to catalog");
            let location = format!("/api/{}/{}", SONGS_API, song.id);
            (StatusCode::CREATED, [(LOCATION, location)], Json(song)).into_response()
        }
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    put,
    path = "/api/songs/{id}",
    tag = "songs",
    params(("id" = Uuid, Path, description = "Identifiant du morceau")),
    request_body = SongMetadata,
    responses(
        (status = 200, description = "Morceau modifié", body = Song),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 401, description = "Authentification requise", body = ErrorResponse),
        (status = 404, description = "Morceau introuvable", body = ErrorResponse),
        (status = 409, description = "Un autre morceau porte déjà cet artiste et ce titre", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn update_song(
    State(songs): State<SongCatalog>,
    Path(id): Path<Uuid>,
    AuthenticatedUser(_caller): AuthenticatedUser,
    ValidatedJson(metadata): ValidatedJson<SongMetadata>,
) -> Response {
    match songs.update_song(id, metadata).await {
        Ok(song) => (StatusCode::OK, Json(song)).into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/songs/{id}",
    tag = "songs",
    params(("id" = Uuid, Path, description = "Identifiant du morceau")),
    responses(
        (status = 204, description = "Morceau supprimé"),
        (status = 401, description = "Authentification requise", body = ErrorResponse),
        (status = 404, description = "Morceau introuvable", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn delete_song(
    State(songs): State<SongCatalog>,
    Path(id): Path<Uuid>,
    AuthenticatedUser(_caller): AuthenticatedUser,
) -> Response {
    if songs.delete(id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        map_error(Error::SongNotFound(id))
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "Tous les utilisateurs", body = [User])
    )
)]
pub async fn list_users(State(users): State<UserDirectory>) -> Response {
    (StatusCode::OK, Json(users.get_all().await)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Nom d'utilisateur alphanumérique")),
    responses(
        (status = 200, description = "Utilisateur", body = User),
        (status = 404, description = "Utilisateur introuvable", body = ErrorResponse)
    )
)]
pub async fn get_user(State(users): State<UserDirectory>, Path(username): Path<String>) -> Response {
    let found = if is_valid_username(&username) {
        users.get_by_name(&username).await
    } else {
        None
    };
    match found {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => map_error(Error::UserNotFound(username)),
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = User,
    responses(
        (status = 201, description = "Utilisateur créé", body = User),
        (status = 400, description = "Requête invalide", body = ErrorResponse),
        (status = 409, description = "Nom d'utilisateur déjà pris", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(users): State<UserDirectory>,
    ValidatedJson(user): ValidatedJson<User>,
) -> Response {
    match users.register(user).await {
        Ok(user) => {
            let location = format!("/api/{}/{}", USERS_API, user.username);
            (StatusCode::CREATED, [(LOCATION, location)], Json(user)).into_response()
        }
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Nom d'utilisateur alphanumérique")),
    responses(
        (status = 204, description = "Utilisateur supprimé"),
        (status = 401, description = "Authentification requise", body = ErrorResponse),
        (status = 403, description = "L'administrateur ne peut pas être supprimé", body = ErrorResponse),
        (status = 404, description = "Utilisateur introuvable", body = ErrorResponse)
    ),
    security(("user_auth" = []))
)]
pub async fn delete_user(
    State(users): State<UserDirectory>,
    Path(username): Path<String>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Response {
    match users.remove_user(&username).await {
        Ok(()) => {
            info!(caller = %caller, username = %username, "User removed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => map_error(err),
    }
}

impl Error {
    /// Code d'erreur stable exposé dans les réponses
    pub fn code(&self) -> &'static str {
        match self {
            Error::SongNotFound(_) => "SONG_NOT_FOUND",
            Error::SongAlreadyExists { .. } => "SONG_ALREADY_EXISTS",
            Error::UserNotFound(_) => "USER_NOT_FOUND",
            Error::UserAlreadyExists(_) => "USER_ALREADY_EXISTS",
            Error::Unauthenticated => "UNAUTHENTICATED",
            Error::Forbidden(_) => "FORBIDDEN",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::SongNotFound(_) | Error::UserNotFound(_) => StatusCode::NOT_FOUND,
            Error::SongAlreadyExists { .. } | Error::UserAlreadyExists(_) => StatusCode::CONFLICT,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Traduit une erreur du catalogue en réponse HTTP
pub fn map_error(error: Error) -> Response {
    let status = error.status();
    if status.is_server_error() {
        tracing::error!("Catalog request failed: {:#}", error);
    }
    (status, Json(ErrorResponse::new(error.code(), error.to_string()))).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        map_error(self)
    }
}
