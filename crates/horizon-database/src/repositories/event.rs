//! Event and event data repository implementations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use horizon_core::error::{AppError, ErrorKind};
use horizon_core::result::AppResult;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_entity::event::{
    CreateEvent, CreateEventData, Event, EventData, EventDataPatch, EventPatch,
};

use super::is_foreign_key_violation;
use crate::store::{EventDataStore, EventStore};

/// Repository for the `events` table.
#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Event, CreateEvent, EventPatch> for EventRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find event", e))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Event>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count events", e))?;

        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list events", e))?;

        Ok(PageResponse::new(events, page, total as u64))
    }

    async fn create(&self, data: &CreateEvent) -> AppResult<Event> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (name, description, start_date, end_date, author_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create event", e))
    }

    async fn update(&self, id: Uuid, patch: &EventPatch) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET name = COALESCE($2, name), \
                               description = COALESCE($3, description), \
                               start_date = COALESCE($4, start_date), \
                               end_date = COALESCE($5, end_date), \
                               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(patch.start_date)
        .bind(patch.end_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update event", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete event", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl EventStore for EventRepository {
    async fn find_by_author(&self, author_id: Uuid) -> AppResult<Vec<Event>> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE author_id = $1 ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list events by author", e)
        })
    }
}

/// Repository for the `event_data` table.
#[derive(Debug, Clone)]
pub struct EventDataRepository {
    pool: PgPool,
}

impl EventDataRepository {
    /// Create a new event data repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventDataStore for EventDataRepository {
    async fn list_for_event(&self, event_id: Uuid) -> AppResult<Vec<EventData>> {
        sqlx::query_as::<_, EventData>(
            "SELECT * FROM event_data WHERE event_id = $1 ORDER BY timestamp ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list event data", e))
    }

    async fn create_data(&self, data: &CreateEventData) -> AppResult<EventData> {
        sqlx::query_as::<_, EventData>(
            "INSERT INTO event_data (event_id, data, timestamp) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(data.event_id)
        .bind(&data.data)
        .bind(data.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::not_found(format!("Event {} not found", data.event_id))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to record event data", e)
            }
        })
    }

    async fn update_data(
        &self,
        event_id: Uuid,
        id: Uuid,
        patch: &EventDataPatch,
    ) -> AppResult<Option<EventData>> {
        sqlx::query_as::<_, EventData>(
            "UPDATE event_data SET data = COALESCE($3, data), \
                                   timestamp = COALESCE($4, timestamp), \
                                   updated_at = NOW() \
             WHERE id = $1 AND event_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(event_id)
        .bind(&patch.data)
        .bind(patch.timestamp)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update event data", e))
    }
}
