use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{CorsSettings, SecurityHeadersLayer};
use crate::handlers::events::{
    create_event, delete_event, get_event, list_event_volunteers, list_events, pay_event,
    update_event,
};
use crate::handlers::health_check;
use crate::services::EventService;

#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventService>,
}

impl AppState {
    pub fn new(events: EventService) -> Self {
        Self {
            events: Arc::new(events),
        }
    }
}

pub fn create_routes(
    state: AppState,
    cors: &CorsSettings,
    security: SecurityHeadersLayer,
) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/:id",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/events/:id/pay", post(pay_event))
        .route("/events/:id/volunteers", get(list_event_volunteers))
        .with_state(state)
        .layer(security)
        .layer(cors.layer())
        .layer(TraceLayer::new_for_http())
}
