//! Server-Sent Events (SSE) endpoint
//!
//! Display pages subscribe here to receive `verse` events; controller pages
//! also listen for `playlist` events to refresh their list.

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use versecast_common::sse::event_bus_sse_stream;

use super::server::AppState;

/// GET /events - SSE event stream
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    event_bus_sse_stream(&state.events, "versecast-controller")
}
