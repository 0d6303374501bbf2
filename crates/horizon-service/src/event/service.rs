//! Event lifecycle and time-series data.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use horizon_core::error::AppError;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_database::store::{EventDataStore, EventStore};
use horizon_entity::event::{
    CreateEvent, CreateEventData, Event, EventData, EventDataPatch, EventPatch,
};

use crate::context::RequestContext;

/// Fields for a new event. The author is the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    /// Event name.
    pub name: String,
    /// Event description.
    pub description: String,
    /// Start time.
    pub start_date: DateTime<Utc>,
    /// End time.
    pub end_date: DateTime<Utc>,
}

/// A new data point for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEventData {
    /// Payload.
    pub data: serde_json::Value,
    /// Observation time; defaults to now.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Handles events and their data points.
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventStore>,
    data: Arc<dyn EventDataStore>,
}

impl std::fmt::Debug for EventService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventService").finish_non_exhaustive()
    }
}

impl EventService {
    /// Creates a new event service.
    pub fn new(events: Arc<dyn EventStore>, data: Arc<dyn EventDataStore>) -> Self {
        Self { events, data }
    }

    /// Lists events, newest first.
    pub async fn list(&self, page: &PageRequest) -> Result<PageResponse<Event>, AppError> {
        self.events.find_all(page).await
    }

    /// Events authored by a user.
    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Event>, AppError> {
        self.events.find_by_author(author_id).await
    }

    /// Fetches one event.
    pub async fn get(&self, id: Uuid) -> Result<Event, AppError> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Creates an event authored by the caller.
    pub async fn create(&self, ctx: &RequestContext, input: NewEvent) -> Result<Event, AppError> {
        check_dates(input.start_date, input.end_date)?;
        let event = self
            .events
            .create(&CreateEvent {
                name: input.name,
                description: input.description,
                start_date: input.start_date,
                end_date: input.end_date,
                author_id: ctx.user_id,
            })
            .await?;
        info!(user_id = %ctx.user_id, event_id = %event.id, "Event created");
        Ok(event)
    }

    /// Updates an event. The caller must be the author or an admin.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: &EventPatch,
    ) -> Result<Event, AppError> {
        let mut event = self.get(id).await?;
        ctx.ensure_owner_or_admin(event.author_id, "event")?;

        patch.apply(&mut event);
        check_dates(event.start_date, event.end_date)?;

        let event = self
            .events
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(user_id = %ctx.user_id, event_id = %id, "Event updated");
        Ok(event)
    }

    /// Deletes an event and its data. The caller must be the author or an admin.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let event = self.get(id).await?;
        ctx.ensure_owner_or_admin(event.author_id, "event")?;
        if !self.events.delete(id).await? {
            return Err(not_found(id));
        }
        info!(user_id = %ctx.user_id, event_id = %id, "Event deleted");
        Ok(())
    }

    /// Data points of an event ordered by timestamp.
    pub async fn list_data(&self, event_id: Uuid) -> Result<Vec<EventData>, AppError> {
        self.get(event_id).await?;
        self.data.list_for_event(event_id).await
    }

    /// Records a data point. The caller must be the author or an admin.
    pub async fn add_data(
        &self,
        ctx: &RequestContext,
        event_id: Uuid,
        input: NewEventData,
    ) -> Result<EventData, AppError> {
        let event = self.get(event_id).await?;
        ctx.ensure_owner_or_admin(event.author_id, "event")?;
        self.data
            .create_data(&CreateEventData {
                event_id,
                data: input.data,
                timestamp: input.timestamp.unwrap_or_else(Utc::now),
            })
            .await
    }

    /// Updates a data point. The caller must be the author or an admin.
    pub async fn update_data(
        &self,
        ctx: &RequestContext,
        event_id: Uuid,
        data_id: Uuid,
        patch: &EventDataPatch,
    ) -> Result<EventData, AppError> {
        let event = self.get(event_id).await?;
        ctx.ensure_owner_or_admin(event.author_id, "event")?;
        self.data
            .update_data(event_id, data_id, patch)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Data {data_id} not found for event {event_id}"))
            })
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Event {id} not found"))
}

fn check_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::validation("endDate must not be before startDate"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use horizon_auth::Identity;
    use horizon_core::error::ErrorKind;
    use horizon_database::memory::MemoryEventStore;

    use super::*;

    fn service() -> EventService {
        let store = Arc::new(MemoryEventStore::new());
        EventService::new(store.clone(), store)
    }

    fn ctx(user_id: Uuid, is_admin: bool) -> RequestContext {
        RequestContext::new(&Identity {
            user_id,
            jti: Uuid::new_v4(),
            is_admin,
            fresh: true,
            expires_at: Utc::now(),
        })
    }

    fn new_event() -> NewEvent {
        let start = Utc::now();
        NewEvent {
            name: "Launch".to_string(),
            description: "Product launch".to_string(),
            start_date: start,
            end_date: start + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn test_rejects_inverted_dates() {
        let service = service();
        let mut input = new_event();
        input.end_date = input.start_date - Duration::hours(1);
        let err = service
            .create(&ctx(Uuid::new_v4(), false), input)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_only_author_or_admin_mutates() {
        let service = service();
        let author = ctx(Uuid::new_v4(), false);
        let event = service.create(&author, new_event()).await.unwrap();
        assert_eq!(event.author_id, author.user_id);

        let patch = EventPatch {
            name: Some("Relaunch".to_string()),
            ..EventPatch::default()
        };
        let stranger = ctx(Uuid::new_v4(), false);
        let err = service.update(&stranger, event.id, &patch).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let updated = service.update(&author, event.id, &patch).await.unwrap();
        assert_eq!(updated.name, "Relaunch");

        let admin = ctx(Uuid::new_v4(), true);
        service.delete(&admin, event.id).await.unwrap();
        let err = service.get(event.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_event_data_flow() {
        let service = service();
        let author = ctx(Uuid::new_v4(), false);
        let event = service.create(&author, new_event()).await.unwrap();

        let point = service
            .add_data(
                &author,
                event.id,
                NewEventData {
                    data: json!({ "visitors": 10 }),
                    timestamp: None,
                },
            )
            .await
            .unwrap();
        let patch = EventDataPatch {
            data: Some(json!({ "visitors": 12 })),
            timestamp: None,
        };
        let updated = service
            .update_data(&author, event.id, point.id, &patch)
            .await
            .unwrap();
        assert_eq!(updated.data["visitors"], 12);

        let rows = service.list_data(event.id).await.unwrap();
        assert_eq!(rows.len(), 1);

        let err = service.list_data(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
