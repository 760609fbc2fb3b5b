//! Server-Sent Events (SSE) streaming of review events.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::SharedState;

/// SSE endpoint: clients subscribe here for open/complete notifications.
pub async fn sse_handler(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        // lagged receivers skip what they missed
        result.ok().and_then(|event| {
            Event::default()
                .id(event.request_id().to_string())
                .event(event_name(&event))
                .json_data(&event)
                .ok()
                .map(Ok)
        })
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn event_name(event: &repurview_review::ReviewEvent) -> &'static str {
    match event {
        repurview_review::ReviewEvent::RequestOpened { .. } => "request_opened",
        repurview_review::ReviewEvent::ReviewCompleted { .. } => "review_completed",
    }
}
