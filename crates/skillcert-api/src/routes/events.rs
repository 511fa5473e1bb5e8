//! # Lifecycle Event Feed
//!
//! - `GET /v1/events?since=N`: Notifications delivered after the first `N`,
//!   in delivery order. `next` is the offset to poll from afterwards.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use skillcert_state::Notification;

use crate::state::AppState;

/// Query parameters for the feed.
#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    #[serde(default)]
    pub since: usize,
}

/// A page of the feed.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventPage {
    pub events: Vec<Notification>,
    pub next: usize,
}

/// Build the events router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/events", get(list_events))
}

/// GET /v1/events
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Json<EventPage> {
    let events = state.events.since(query.since);
    let next = query.since + events.len();
    Json(EventPage { events, next })
}
