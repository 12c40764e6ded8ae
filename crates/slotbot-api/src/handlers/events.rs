//! Server-sent event stream of hub events.

use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use tracing::info;

use crate::state::AppState;

/// GET /events
///
/// Each hub event becomes one SSE message named after its kind with the JSON
/// payload as data. No history is replayed.
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let observer = state.services.hub.register();
    info!(
        observer_id = %observer.id(),
        observers = state.services.hub.observer_count(),
        "Dashboard observer connected"
    );

    let stream = observer.map(|event| {
        Event::default()
            .event(event.kind.as_str())
            .json_data(&event.payload)
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new().interval(Duration::from_secs(state.config.realtime.keep_alive_seconds)),
    )
}
