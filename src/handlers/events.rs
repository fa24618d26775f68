use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, Sse};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::errors::AppError;
use crate::models::Session;
use crate::state::AppState;

// GET /api/events: SSE stream of the caller's booking changes
#[derive(Deserialize)]
pub struct SseQuery {
    pub token: Option<String>,
}

pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SseQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Auth via query param (EventSource can't set headers)
    let session = Session::from_token(query.token.as_deref().unwrap_or(""))?;
    let user_id = session.user_id;

    tracing::debug!(user_id = %user_id, "event stream opened");

    let rx = state.events_tx.subscribe();
    let live_stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) if event.concerns(user_id) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(data).event("booking")))
        }
        Ok(_) => None,
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(user_id = %user_id, skipped = n, "event stream lagged");
            None
        }
    });

    let keepalive_stream = tokio_stream::StreamExt::map(
        tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(Duration::from_secs(30))),
        |_| Ok(Event::default().comment("keepalive")),
    );

    Ok(Sse::new(StreamExt::merge(live_stream, keepalive_stream)))
}
