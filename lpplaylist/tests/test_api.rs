//! Tests HTTP de l'API playlists

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use lpcatalog::{SongCatalog, SongMetadata, User, UserDirectory};
use lpplaylist::PlaylistDirectory;
use lpplaylist::api::{PlaylistApiState, playlist_api_router};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    songs: SongCatalog,
    playlists: PlaylistDirectory,
}

async fn setup() -> TestApp {
    let songs = SongCatalog::new();
    let users = UserDirectory::with_admin("admin").await;
    users.create(User::new("alice", "Alice")).await;
    users.create(User::new("bob", "Bob")).await;
    let playlists = PlaylistDirectory::default();

    let state = PlaylistApiState {
        playlists: playlists.clone(),
        songs: songs.clone(),
        users,
    };
    TestApp {
        router: Router::new().nest("/api/playlists", playlist_api_router(state)),
        songs,
        playlists,
    }
}

impl TestApp {
    async fn send(
        &self,
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

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn song(&self, artist: &str, title: &str) -> Uuid {
        self.songs
            .create_song(SongMetadata::new(artist, title))
            .await
            .unwrap()
            .id
    }

    async fn playlist(&self, owner: &str) -> Uuid {
        let (status, json) = self
            .send(
                "POST",
                "/api/playlists",
                Some(owner),
                Some(json!({ "name": "Friday night" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_value(json["id"].clone()).unwrap()
    }
}

fn titles(entries: &Value) -> Vec<String> {
    entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_playlist_assigns_owner() {
    let app = setup().await;

    let (status, _) = app
        .send("POST", "/api/playlists", None, Some(json!({ "name": "x" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = app
        .send("POST", "/api/playlists", Some("alice"), Some(json!({ "name": "" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_FAILED");

    let id = app.playlist("alice").await;
    let (status, json) = app
        .send("GET", &format!("/api/playlists/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["owner"], "alice");
    assert_eq!(json["description"], "");
    assert_eq!(json["entryCount"], 0);

    let (status, json) = app.send("GET", "/api/playlists", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mutation_pipeline_order() {
    let app = setup().await;
    let id = app.playlist("alice").await;
    let song = app.song("Abc", "Xyz").await;
    let uri = format!("/api/playlists/{id}/add-songs");
    let valid = json!({ "songIds": [song] });

    // Authentification avant validation
    let (status, _) = app.send("POST", &uri, None, Some(json!({ "songIds": [] }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Validation avant résolution de la playlist
    let missing = format!("/api/playlists/{}/add-songs", Uuid::new_v4());
    let (status, _) = app
        .send("POST", &missing, Some("bob"), Some(json!({ "songIds": [] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .send("POST", &uri, Some("alice"), Some(json!({ "songIds": [song], "index": -1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Existence avant propriété
    let (status, json) = app
        .send("POST", &missing, Some("bob"), Some(valid.clone()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "PLAYLIST_NOT_FOUND");

    // Propriété avant résolution des morceaux
    let unknown_song = json!({ "songIds": [Uuid::new_v4()] });
    let (status, json) = app
        .send("POST", &uri, Some("bob"), Some(unknown_song.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "FORBIDDEN");

    let (status, json) = app
        .send("POST", &uri, Some("alice"), Some(unknown_song))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "SONG_NOT_FOUND");

    let (status, json) = app.send("POST", &uri, Some("ALICE"), Some(valid)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&json), vec!["Xyz"]);
}

#[tokio::test]
async fn test_entry_operations() {
    let app = setup().await;
    let id = app.playlist("alice").await;
    let x = app.song("A", "X").await;
    let y = app.song("A", "Y").await;
    let a = app.song("B", "A").await;
    let b = app.song("B", "B").await;
    let base = format!("/api/playlists/{id}");

    app.send(
        "POST",
        &format!("{base}/add-songs"),
        Some("alice"),
        Some(json!({ "songIds": [x, y] })),
    )
    .await;
    let (status, json) = app
        .send(
            "POST",
            &format!("{base}/add-songs"),
            Some("alice"),
            Some(json!({ "songIds": [a, b], "index": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&json), vec!["X", "A", "B", "Y"]);

    let first_entry = json[0]["entryId"].clone();
    let (status, json) = app
        .send(
            "POST",
            &format!("{base}/move-song"),
            Some("alice"),
            Some(json!({ "entryId": first_entry, "index": 1000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&json), vec!["A", "B", "Y", "X"]);

    let removed = json!({ "entryIds": [json[0]["entryId"], json[2]["entryId"], Uuid::new_v4()] });
    let (status, json) = app
        .send("POST", &format!("{base}/remove-songs"), Some("alice"), Some(removed))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&json), vec!["B", "X"]);

    let (status, json) = app
        .send("GET", &format!("{base}/songs"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&json), vec!["B", "X"]);

    let (status, json) = app
        .send("POST", &format!("{base}/clear"), Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_update_keeps_owner() {
    let app = setup().await;
    let id = app.playlist("alice").await;
    let uri = format!("/api/playlists/{id}");
    let body = json!({ "name": "Renamed", "description": "late set" });

    let (status, _) = app.send("PUT", &uri, Some("bob"), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app.send("PUT", &uri, Some("Alice"), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Renamed");
    assert_eq!(json["description"], "late set");
    assert_eq!(json["owner"], "alice");

    let missing = format!("/api/playlists/{}", Uuid::new_v4());
    let (status, _) = app
        .send("PUT", &missing, Some("alice"), Some(json!({ "name": "x" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_playlist() {
    let app = setup().await;
    let id = app.playlist("alice").await;
    let uri = format!("/api/playlists/{id}");

    let (status, _) = app.send("DELETE", &uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app.send("DELETE", &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(json, Value::Null);

    let (status, _) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.playlists.is_empty().await);
}

#[tokio::test]
async fn test_fifo_eviction_through_api() {
    let app = setup().await;
    let id = app.playlist("alice").await;
    let first = app.song("A", "first").await;
    let filler = app.song("A", "filler").await;
    let last = app.song("A", "last").await;
    let uri = format!("/api/playlists/{id}/add-songs");

    let mut batch = vec![first];
    batch.extend(std::iter::repeat_n(filler, 199));
    let (_, json) = app
        .send("POST", &uri, Some("alice"), Some(json!({ "songIds": batch })))
        .await;
    assert_eq!(json.as_array().unwrap().len(), 200);

    let (status, json) = app
        .send("POST", &uri, Some("alice"), Some(json!({ "songIds": [last] })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let entries = titles(&json);
    assert_eq!(entries.len(), 200);
    assert_eq!(entries[0], "filler");
    assert_eq!(entries[199], "last");
}
