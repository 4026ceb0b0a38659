// Process-local storage for dev runs and tests.
// Mirrors the Postgres behaviour the service relies on: organizer foreign
// key, RETURNING-style results and NotFound on update/delete of unknown ids.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::{EventRepository, StorageError, VolunteerRepository};
use crate::models::{Event, NewEvent, Organizer, UpdateEventRequest, Volunteer};

#[derive(Default)]
pub struct InMemoryStore {
    organizers: RwLock<HashMap<Uuid, Organizer>>,
    events: RwLock<HashMap<Uuid, Event>>,
    volunteers: RwLock<HashMap<Uuid, Volunteer>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_organizer(&self, organizer: Organizer) {
        self.organizers.write().insert(organizer.id, organizer);
    }

    pub fn insert_volunteer(&self, volunteer: Volunteer) {
        self.volunteers.write().insert(volunteer.id, volunteer);
    }

    fn ensure_organizer(&self, organizer_id: Uuid) -> Result<(), StorageError> {
        if self.organizers.read().contains_key(&organizer_id) {
            Ok(())
        } else {
            Err(StorageError::MissingRelation(format!(
                "organizer '{organizer_id}' does not exist"
            )))
        }
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn insert(&self, event: NewEvent) -> Result<Event, StorageError> {
        self.ensure_organizer(event.organizer_id)?;

        let now = Utc::now();
        let row = Event {
            id: Uuid::new_v4(),
            organizer_id: event.organizer_id,
            title: event.title,
            description: event.description,
            location: event.location,
            date: event.date,
            price: event.price,
            image_url: event.image_url,
            volunteer_id: event.volunteer_id,
            created_at: now,
            updated_at: now,
        };
        self.events.write().insert(row.id, row.clone());
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<Event>, StorageError> {
        let mut rows: Vec<Event> = self.events.read().values().cloned().collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StorageError> {
        Ok(self.events.read().get(&id).cloned())
    }

    async fn update(&self, id: Uuid, changes: UpdateEventRequest) -> Result<Event, StorageError> {
        if let Some(organizer_id) = changes.organizer_id {
            self.ensure_organizer(organizer_id)?;
        }

        let mut events = self.events.write();
        let event = events
            .get_mut(&id)
            .ok_or(StorageError::NotFound { entity: "event", id })?;

        if let Some(title) = changes.title {
            event.title = title;
        }
        if let Some(description) = changes.description {
            event.description = Some(description);
        }
        if let Some(location) = changes.location {
            event.location = location;
        }
        if let Some(organizer_id) = changes.organizer_id {
            event.organizer_id = organizer_id;
        }
        if let Some(date) = changes.date {
            event.date = date;
        }
        if let Some(price) = changes.price {
            event.price = price;
        }
        if let Some(image_url) = changes.image_url {
            event.image_url = image_url;
        }
        if let Some(volunteer_id) = changes.volunteer_id {
            event.volunteer_id = Some(volunteer_id);
        }
        event.updated_at = Utc::now();

        Ok(event.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Event, StorageError> {
        self.events
            .write()
            .remove(&id)
            .ok_or(StorageError::NotFound { entity: "event", id })
    }
}

#[async_trait]
impl VolunteerRepository for InMemoryStore {
    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Volunteer>, StorageError> {
        let mut rows: Vec<Volunteer> = self
            .volunteers
            .read()
            .values()
            .filter(|v| v.event_id == Some(event_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn organizer() -> Organizer {
        let now = Utc::now();
        Organizer {
            id: Uuid::new_v4(),
            name: "Tech Meetups".to_string(),
            description: None,
            contact_email: "hello@meetups.dev".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn new_event(organizer_id: Uuid) -> NewEvent {
        NewEvent {
            organizer_id,
            title: "Rust Night".to_string(),
            description: None,
            location: "Recife".to_string(),
            date: Utc.with_ymd_and_hms(2026, 11, 20, 19, 0, 0).unwrap(),
            price: Decimal::new(2500, 2),
            image_url: String::new(),
            volunteer_id: None,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_organizer() {
        let store = InMemoryStore::new();

        let err = store.insert(new_event(Uuid::new_v4())).await.unwrap_err();

        assert!(matches!(err, StorageError::MissingRelation(_)));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id_are_not_found() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();

        let err = store
            .update(id, UpdateEventRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: missing, .. } if missing == id));

        let err = store.delete(id).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_organizer() {
        let store = InMemoryStore::new();
        let org = organizer();
        store.insert_organizer(org.clone());
        let event = store.insert(new_event(org.id)).await.unwrap();

        let changes = UpdateEventRequest {
            organizer_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let err = store.update(event.id, changes).await.unwrap_err();

        assert!(matches!(err, StorageError::MissingRelation(_)));
        assert_eq!(store.get(event.id).await.unwrap().unwrap().organizer_id, org.id);
    }
}
