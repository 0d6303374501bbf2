//! In-memory report store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use horizon_core::result::AppResult;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_entity::report::{CreateReport, Report, ReportPatch};

use super::newest_first_page;
use crate::store::ReportStore;

/// In-memory report table.
#[derive(Debug, Clone, Default)]
pub struct MemoryReportStore {
    rows: Arc<RwLock<Vec<Report>>>,
}

impl MemoryReportStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Report, CreateReport, ReportPatch> for MemoryReportStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>> {
        Ok(self.rows.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Report>> {
        let rows = self.rows.read().await;
        Ok(newest_first_page(&rows, page))
    }

    async fn create(&self, data: &CreateReport) -> AppResult<Report> {
        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            event_id: data.event_id,
            filters: data.filters.clone(),
            format: data.format.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(report.clone());
        Ok(report)
    }

    async fn update(&self, id: Uuid, patch: &ReportPatch) -> AppResult<Option<Report>> {
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|r| r.id == id).map(|report| {
            patch.apply(report);
            report.updated_at = Utc::now();
            report.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Report>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_find_by_user_and_paging() {
        let store = MemoryReportStore::new();
        let owner = Uuid::new_v4();
        for format in ["csv", "pdf", "json"] {
            store
                .create(&CreateReport {
                    user_id: owner,
                    event_id: Uuid::new_v4(),
                    filters: json!({}),
                    format: format.to_string(),
                })
                .await
                .unwrap();
        }
        store
            .create(&CreateReport {
                user_id: Uuid::new_v4(),
                event_id: Uuid::new_v4(),
                filters: json!({}),
                format: "csv".to_string(),
            })
            .await
            .unwrap();

        let mine = store.find_by_user(owner).await.unwrap();
        assert_eq!(mine.len(), 3);
        assert_eq!(mine[0].format, "json");

        let page = store.find_all(&PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next());
    }
}
