//! Persistence seam for events and volunteers.
//!
//! The service layer only sees the repository traits; `PgStore` backs them
//! with Postgres and `InMemoryStore` with process-local maps.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Event, NewEvent, UpdateEventRequest, Volunteer};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{entity} '{id}' does not exist")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("related record does not exist: {0}")]
    MissingRelation(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: NewEvent) -> Result<Event, StorageError>;
    async fn list(&self) -> Result<Vec<Event>, StorageError>;
    async fn get(&self, id: Uuid) -> Result<Option<Event>, StorageError>;
    /// Fails with [`StorageError::NotFound`] when `id` is unknown.
    async fn update(&self, id: Uuid, changes: UpdateEventRequest) -> Result<Event, StorageError>;
    /// Returns the removed record.
    async fn delete(&self, id: Uuid) -> Result<Event, StorageError>;
}

#[async_trait]
pub trait VolunteerRepository: Send + Sync {
    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Volunteer>, StorageError>;
}
