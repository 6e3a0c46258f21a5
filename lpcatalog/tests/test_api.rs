//! Tests HTTP des API morceaux et utilisateurs

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use lpcatalog::api::{CatalogApiState, songs_api_router, users_api_router};
use lpcatalog::{Song, SongCatalog, SongMetadata, User, UserDirectory};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn setup() -> (Router, SongCatalog, UserDirectory) {
    let songs = SongCatalog::new();
    let users = UserDirectory::with_admin("admin").await;
    users.create(User::new("alice", "Alice")).await;

    let state = CatalogApiState {
        songs: songs.clone(),
        users: users.clone(),
    };
    let app = Router::new()
        .nest("/api/songs", songs_api_router(state.clone()))
        .nest("/api/users", users_api_router(state));
    (app, songs, users)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("User {}", user));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_create_song_requires_authentication() {
    let (app, songs, _) = setup().await;
    let body = json!({ "artist": "Abc", "title": "Xyz" });

    let (status, json) = send(&app, "POST", "/api/songs", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "UNAUTHENTICATED");

    let (status, _) = send(&app, "POST", "/api/songs", Some("nobody"), Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(songs.is_empty().await);
}

#[tokio::test]
async fn test_create_song_then_conflict() {
    let (app, songs, _) = setup().await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/songs",
        Some("alice"),
        Some(json!({ "artist": "Abc", "title": "Xyz" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Song = serde_json::from_value(json).unwrap();
    assert_eq!(songs.get_by_id(created.id).await, Some(created));

    let (status, json) = send(
        &app,
        "POST",
        "/api/songs",
        Some("ALICE"),
        Some(json!({ "artist": "ABC", "title": "xyz" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "SONG_ALREADY_EXISTS");
    assert_eq!(songs.len().await, 1);
}

#[tokio::test]
async fn test_create_song_validation() {
    let (app, _, _) = setup().await;
    let (status, json) = send(
        &app,
        "POST",
        "/api/songs",
        Some("alice"),
        Some(json!({ "artist": "", "title": "Xyz" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_search_and_get_song() {
    let (app, songs, _) = setup().await;
    let song = songs
        .create_song(SongMetadata::new("Daft Punk", "One More Time"))
        .await
        .unwrap();
    songs
        .create_song(SongMetadata::new("Queen", "Bohemian Rhapsody"))
        .await
        .unwrap();

    let (status, json) = send(&app, "GET", "/api/songs?searchTerm=PUNK", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, json) = send(&app, "GET", "/api/songs", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);

    let uri = format!("/api/songs/{}", song.id);
    let (status, json) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "One More Time");

    let uri = format!("/api/songs/{}", uuid::Uuid::new_v4());
    let (status, json) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "SONG_NOT_FOUND");
}

#[tokio::test]
async fn test_update_and_delete_song() {
    let (app, songs, _) = setup().await;
    let song = songs
        .create_song(SongMetadata::new("Abc", "Xyz"))
        .await
        .unwrap();
    let uri = format!("/api/songs/{}", song.id);

    let (status, json) = send(
        &app,
        "PUT",
        &uri,
        Some("alice"),
        Some(json!({ "artist": "Abc", "title": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Renamed");

    let (status, _) = send(&app, "DELETE", &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_api() {
    let (app, _, users) = setup().await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "username": "bob", "displayName": "Bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["displayName"], "Bob");

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "username": "BOB", "displayName": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "username": "bad name", "displayName": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, "GET", "/api/users/Bob", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", "/api/users/admin", Some("alice"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", "/api/users/bob", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "DELETE", "/api/users/bob", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(users.get_by_name("bob").await.is_none());
}
