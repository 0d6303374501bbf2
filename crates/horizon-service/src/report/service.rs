//! Reports over events.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use horizon_core::error::AppError;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_database::store::{EventStore, ReportStore};
use horizon_entity::report::{CreateReport, Report, ReportPatch};

use crate::context::RequestContext;

/// Handles report CRUD.
#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportStore>,
    events: Arc<dyn EventStore>,
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService").finish_non_exhaustive()
    }
}

impl ReportService {
    /// Creates a new report service.
    pub fn new(reports: Arc<dyn ReportStore>, events: Arc<dyn EventStore>) -> Self {
        Self { reports, events }
    }

    /// Lists reports, newest first.
    pub async fn list(&self, page: &PageRequest) -> Result<PageResponse<Report>, AppError> {
        self.reports.find_all(page).await
    }

    /// Fetches one report.
    pub async fn get(&self, id: Uuid) -> Result<Report, AppError> {
        self.reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Creates a report owned by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        event_id: Uuid,
        filters: serde_json::Value,
        format: String,
    ) -> Result<Report, AppError> {
        if !filters.is_object() {
            return Err(AppError::validation("filters must be a JSON object"));
        }
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(AppError::validation(format!("Event {event_id} does not exist")));
        }

        let report = self
            .reports
            .create(&CreateReport {
                user_id: ctx.user_id,
                event_id,
                filters,
                format,
            })
            .await?;
        info!(user_id = %ctx.user_id, report_id = %report.id, "Report created");
        Ok(report)
    }

    /// Updates a report. The caller must own it or be an admin.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: &ReportPatch,
    ) -> Result<Report, AppError> {
        let report = self.get(id).await?;
        ctx.ensure_owner_or_admin(report.user_id, "report")?;
        if patch.filters.as_ref().is_some_and(|f| !f.is_object()) {
            return Err(AppError::validation("filters must be a JSON object"));
        }

        self.reports
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Deletes a report. The caller must own it or be an admin.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let report = self.get(id).await?;
        ctx.ensure_owner_or_admin(report.user_id, "report")?;
        if !self.reports.delete(id).await? {
            return Err(not_found(id));
        }
        info!(user_id = %ctx.user_id, report_id = %id, "Report deleted");
        Ok(())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Report {id} not found"))
}
