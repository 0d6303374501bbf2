//! In-memory alert store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use horizon_core::result::AppResult;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_entity::alert::{Alert, AlertPatch, CreateAlert};

use super::newest_first_page;
use crate::store::AlertStore;

/// In-memory alert table.
#[derive(Debug, Clone, Default)]
pub struct MemoryAlertStore {
    rows: Arc<RwLock<Vec<Alert>>>,
}

impl MemoryAlertStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Alert, CreateAlert, AlertPatch> for MemoryAlertStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>> {
        Ok(self.rows.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Alert>> {
        let rows = self.rows.read().await;
        Ok(newest_first_page(&rows, page))
    }

    async fn create(&self, data: &CreateAlert) -> AppResult<Alert> {
        let now = Utc::now();
        let alert = Alert {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            event_id: data.event_id,
            condition: data.condition.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(alert.clone());
        Ok(alert)
    }

    async fn update(&self, id: Uuid, patch: &AlertPatch) -> AppResult<Option<Alert>> {
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|a| a.id == id).map(|alert| {
            patch.apply(alert);
            alert.updated_at = Utc::now();
            alert.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|a| a.id != id);
        Ok(rows.len() < before)
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn find_by_event(&self, event_id: Uuid) -> AppResult<Vec<Alert>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect())
    }
}
