use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EventRepository, StorageError, VolunteerRepository};
use crate::models::{Event, NewEvent, UpdateEventRequest, Volunteer};

const EVENT_COLUMNS: &str = "id, organizer_id, title, description, location, date, price, \
                             image_url, volunteer_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn classify(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return StorageError::MissingRelation(db_err.message().to_string());
        }
    }
    StorageError::Database(err)
}

#[async_trait]
impl EventRepository for PgStore {
    async fn insert(&self, event: NewEvent) -> Result<Event, StorageError> {
        let sql = format!(
            r#"
            INSERT INTO events
                (organizer_id, title, description, location, date, price, image_url, volunteer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {EVENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(event.organizer_id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.date)
            .bind(event.price)
            .bind(&event.image_url)
            .bind(event.volunteer_id)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn list(&self) -> Result<Vec<Event>, StorageError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at");
        let rows = sqlx::query_as::<_, Event>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, StorageError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: UpdateEventRequest) -> Result<Event, StorageError> {
        let sql = format!(
            r#"
            UPDATE events
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                organizer_id = COALESCE($5, organizer_id),
                date = COALESCE($6, date),
                price = COALESCE($7, price),
                image_url = COALESCE($8, image_url),
                volunteer_id = COALESCE($9, volunteer_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(&changes.location)
            .bind(changes.organizer_id)
            .bind(changes.date)
            .bind(changes.price)
            .bind(&changes.image_url)
            .bind(changes.volunteer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .ok_or(StorageError::NotFound { entity: "event", id })
    }

    async fn delete(&self, id: Uuid) -> Result<Event, StorageError> {
        let sql = format!("DELETE FROM events WHERE id = $1 RETURNING {EVENT_COLUMNS}");
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound { entity: "event", id })
    }
}

#[async_trait]
impl VolunteerRepository for PgStore {
    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Volunteer>, StorageError> {
        let rows = sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT id, name, email, event_id, created_at, updated_at
            FROM volunteers
            WHERE event_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
