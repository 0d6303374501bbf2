//! In-memory event and event data store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use horizon_core::error::AppError;
use horizon_core::result::AppResult;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_entity::event::{
    CreateEvent, CreateEventData, Event, EventData, EventDataPatch, EventPatch,
};

use super::newest_first_page;
use crate::store::{EventDataStore, EventStore};

#[derive(Debug, Default)]
struct Tables {
    events: Vec<Event>,
    data: Vec<EventData>,
}

/// Events and their data points behind a single lock, so deleting an
/// event removes its data in the same step.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryEventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Event, CreateEvent, EventPatch> for MemoryEventStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Event>> {
        let tables = self.tables.read().await;
        Ok(newest_first_page(&tables.events, page))
    }

    async fn create(&self, data: &CreateEvent) -> AppResult<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            description: data.description.clone(),
            start_date: data.start_date,
            end_date: data.end_date,
            author_id: data.author_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.events.push(event.clone());
        Ok(event)
    }

    async fn update(&self, id: Uuid, patch: &EventPatch) -> AppResult<Option<Event>> {
        let mut tables = self.tables.write().await;
        Ok(tables.events.iter_mut().find(|e| e.id == id).map(|event| {
            patch.apply(event);
            event.updated_at = Utc::now();
            event.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        if tables.events.len() == before {
            return Ok(false);
        }
        tables.data.retain(|d| d.event_id != id);
        Ok(true)
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn find_by_author(&self, author_id: Uuid) -> AppResult<Vec<Event>> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .iter()
            .rev()
            .filter(|e| e.author_id == author_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EventDataStore for MemoryEventStore {
    async fn list_for_event(&self, event_id: Uuid) -> AppResult<Vec<EventData>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<EventData> = tables
            .data
            .iter()
            .filter(|d| d.event_id == event_id)
            .cloned()
            .collect();
        rows.sort_by_key(|d| d.timestamp);
        Ok(rows)
    }

    async fn create_data(&self, data: &CreateEventData) -> AppResult<EventData> {
        let mut tables = self.tables.write().await;
        if !tables.events.iter().any(|e| e.id == data.event_id) {
            return Err(AppError::not_found(format!(
                "Event {} not found",
                data.event_id
            )));
        }
        let now = Utc::now();
        let row = EventData {
            id: Uuid::new_v4(),
            event_id: data.event_id,
            data: data.data.clone(),
            timestamp: data.timestamp,
            created_at: now,
            updated_at: now,
        };
        tables.data.push(row.clone());
        Ok(row)
    }

    async fn update_data(
        &self,
        event_id: Uuid,
        id: Uuid,
        patch: &EventDataPatch,
    ) -> AppResult<Option<EventData>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .data
            .iter_mut()
            .find(|d| d.id == id && d.event_id == event_id)
            .map(|row| {
                patch.apply(row);
                row.updated_at = Utc::now();
                row.clone()
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use horizon_core::error::ErrorKind;
    use serde_json::json;

    fn new_event(author_id: Uuid) -> CreateEvent {
        let start = Utc::now();
        CreateEvent {
            name: "Launch".to_string(),
            description: "Product launch".to_string(),
            start_date: start,
            end_date: start + Duration::hours(2),
            author_id,
        }
    }

    #[tokio::test]
    async fn test_data_ordered_by_timestamp() {
        let store = MemoryEventStore::new();
        let event = store.create(&new_event(Uuid::new_v4())).await.unwrap();
        let now = Utc::now();
        for offset in [3, 1, 2] {
            store
                .create_data(&CreateEventData {
                    event_id: event.id,
                    data: json!({ "n": offset }),
                    timestamp: now + Duration::minutes(offset),
                })
                .await
                .unwrap();
        }
        let rows = store.list_for_event(event.id).await.unwrap();
        let order: Vec<i64> = rows.iter().filter_map(|r| r.data["n"].as_i64()).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_data_requires_existing_event() {
        let store = MemoryEventStore::new();
        let err = store
            .create_data(&CreateEventData {
                event_id: Uuid::new_v4(),
                data: json!({}),
                timestamp: Utc::now(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_data() {
        let store = MemoryEventStore::new();
        let event = store.create(&new_event(Uuid::new_v4())).await.unwrap();
        let row = store
            .create_data(&CreateEventData {
                event_id: event.id,
                data: json!({ "temp": 21 }),
                timestamp: Utc::now(),
            })
            .await
            .unwrap();

        let patch = EventDataPatch {
            data: Some(json!({ "temp": 22 })),
            timestamp: None,
        };
        assert!(store
            .update_data(Uuid::new_v4(), row.id, &patch)
            .await
            .unwrap()
            .is_none());
        let updated = store.update_data(event.id, row.id, &patch).await.unwrap();
        assert_eq!(updated.unwrap().data["temp"], 22);

        assert!(store.delete(event.id).await.unwrap());
        assert!(store.list_for_event(event.id).await.unwrap().is_empty());
    }
}
