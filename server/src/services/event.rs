use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::Clock;
use crate::models::{
    CheckoutLink, CreateEventRequest, Event, NewEvent, UpdateEventRequest, Volunteer,
};
use crate::payments::{CheckoutGateway, CheckoutRequest, PaymentConfig, PaymentError};
use crate::storage::{EventRepository, VolunteerRepository};
use crate::utils::error::AppError;

const MISSING_FIELDS: &str = "Missing required fields";

pub struct EventService {
    events: Arc<dyn EventRepository>,
    volunteers: Arc<dyn VolunteerRepository>,
    gateway: Arc<dyn CheckoutGateway>,
    payment: PaymentConfig,
    clock: Arc<dyn Clock>,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        volunteers: Arc<dyn VolunteerRepository>,
        gateway: Arc<dyn CheckoutGateway>,
        payment: PaymentConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            events,
            volunteers,
            gateway,
            payment,
            clock,
        }
    }

    pub async fn create(&self, req: CreateEventRequest) -> Result<Event, AppError> {
        let (Some(title), Some(location)) = (present(req.title), present(req.location)) else {
            return Err(AppError::ValidationError(MISSING_FIELDS.to_string()));
        };

        let new_event = NewEvent {
            organizer_id: req.organizer_id,
            title,
            description: req.description,
            location,
            date: req.date,
            price: req.price,
            image_url: String::new(),
            volunteer_id: req.volunteer_id,
        };

        let event = self.events.insert(new_event).await?;
        info!(event_id = %event.id, organizer_id = %event.organizer_id, "Event created");
        Ok(event)
    }

    pub async fn find_all(&self) -> Result<Vec<Event>, AppError> {
        Ok(self.events.list().await?)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        Ok(self.events.get(id).await?)
    }

    pub async fn update(&self, id: Uuid, changes: UpdateEventRequest) -> Result<Event, AppError> {
        let event = self.events.update(id, changes).await?;
        info!(event_id = %id, "Event updated");
        Ok(event)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Event, AppError> {
        let event = self.events.delete(id).await?;
        info!(event_id = %id, "Event deleted");
        Ok(event)
    }

    /// Opens a new gateway checkout for the event. Each call creates an
    /// independent session; nothing is recorded against the event.
    pub async fn pay(&self, id: Uuid) -> Result<CheckoutLink, PaymentError> {
        let event = self
            .events
            .get(id)
            .await?
            .ok_or(PaymentError::EventNotFound(id))?;

        let reference_id = Uuid::new_v4();
        let request =
            CheckoutRequest::for_event(&event, &self.payment, reference_id, self.clock.now())?;

        let checkout = self.gateway.create_checkout(&request).await?;
        info!(
            event_id = %id,
            reference_id = %reference_id,
            checkout_id = %checkout.id,
            "Checkout session opened"
        );
        Ok(checkout)
    }

    pub async fn find_volunteers(&self, event_id: Uuid) -> Result<Vec<Volunteer>, AppError> {
        Ok(self.volunteers.list_by_event(event_id).await?)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
