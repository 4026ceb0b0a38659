use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub date: DateTime<Utc>,
    pub price: Decimal,
    pub image_url: String,
    pub volunteer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /events`.
///
/// `title` and `location` are optional here so that a missing value is
/// reported by the service as a validation error instead of a JSON
/// extraction failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub organizer_id: Uuid,
    pub date: DateTime<Utc>,
    pub volunteer_id: Option<Uuid>,
    pub price: Decimal,
}

/// Partial update. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub organizer_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub volunteer_id: Option<Uuid>,
}

/// Validated row handed to storage on insert.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub organizer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub date: DateTime<Utc>,
    pub price: Decimal,
    pub image_url: String,
    pub volunteer_id: Option<Uuid>,
}

/// Customer-facing result of a payment initiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLink {
    pub id: String,
    pub link: String,
}
