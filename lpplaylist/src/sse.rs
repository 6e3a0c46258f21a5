//! SSE pour suivre les évènements de playlists.
//!
//! Route type : `GET /api/playlists/events?playlist_id=<uuid>`

use async_stream::stream;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    response::sse::{Event, KeepAlive, Sse},
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::directory::PlaylistDirectory;
use crate::events::PlaylistEventEnvelope;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
pub struct EventsQuery {
    /// Filtrer sur une playlist précise (optionnel).
    #[serde(default)]
    pub playlist_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EventPayload {
    pub playlist_id: Uuid,
    pub kind: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub source_client: Option<String>,
}

impl From<&PlaylistEventEnvelope> for EventPayload {
    fn from(envelope: &PlaylistEventEnvelope) -> Self {
        Self {
            playlist_id: envelope.event.playlist_id,
            kind: envelope.event.kind.as_str().to_string(),
            timestamp: envelope.timestamp,
            source_client: envelope.source_client.clone(),
        }
    }
}

/// Handler SSE : diffuse les évènements playlist.
#[utoipa::path(
    get,
    path = "/api/playlists/events",
    tag = "playlists",
    params(EventsQuery),
    responses(
        (status = 200, description = "Flux SSE des évènements playlists (created, updated, entries_changed, deleted)", content_type = "text/event-stream")
    )
)]
pub async fn playlist_events_sse(
    State(playlists): State<PlaylistDirectory>,
    Query(params): Query<EventsQuery>,
) -> impl IntoResponse {
    let mut rx = playlists.subscribe_events();

    let stream = stream! {
        loop {
            let envelope = match rx.recv().await {
                Ok(envelope) => envelope,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Playlist event subscriber lagging");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            if let Some(filter) = params.playlist_id {
                if envelope.event.playlist_id != filter {
                    continue;
                }
            }

            if let Ok(json) = serde_json::to_string(&EventPayload::from(&envelope)) {
                yield Ok::<_, axum::Error>(Event::default().event("playlist").data(json));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
