use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::models::{CreateEventRequest, UpdateEventRequest};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

// Extractor rejections are taken as `Result` so they answer with the
// AppError envelope instead of axum's plain-text body.
type EventId = Result<Path<Uuid>, PathRejection>;

pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let event = state.events.create(req).await?;
    Ok(created(event, "Event created"))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = state.events.find_all().await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn get_event(
    State(state): State<AppState>,
    id: EventId,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let event = state
        .events
        .find_one(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{id}' was not found")))?;
    Ok(success(event, "Event retrieved"))
}

pub async fn update_event(
    State(state): State<AppState>,
    id: EventId,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    let event = state.events.update(id, changes).await?;
    Ok(success(event, "Event updated"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    id: EventId,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let event = state.events.delete(id).await?;
    Ok(success(event, "Event deleted"))
}

pub async fn pay_event(State(state): State<AppState>, id: EventId) -> Result<Response, AppError> {
    let Path(id) = id?;
    let checkout = state.events.pay(id).await?;
    Ok(created(checkout, "Checkout created"))
}

pub async fn list_event_volunteers(
    State(state): State<AppState>,
    id: EventId,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let volunteers = state.events.find_volunteers(id).await?;
    Ok(success(volunteers, "Volunteers retrieved"))
}
