//! Report repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use horizon_core::error::{AppError, ErrorKind};
use horizon_core::result::AppResult;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_entity::report::{CreateReport, Report, ReportPatch};

use super::is_foreign_key_violation;
use crate::store::ReportStore;

/// Repository for the `reports` table.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    /// Create a new report repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Report, CreateReport, ReportPatch> for ReportRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>> {
        sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find report", e))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Report>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count reports", e)
            })?;

        let reports = sqlx::query_as::<_, Report>(
            "SELECT * FROM reports ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list reports", e))?;

        Ok(PageResponse::new(reports, page, total as u64))
    }

    async fn create(&self, data: &CreateReport) -> AppResult<Report> {
        sqlx::query_as::<_, Report>(
            "INSERT INTO reports (user_id, event_id, filters, format) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.event_id)
        .bind(&data.filters)
        .bind(&data.format)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::validation("Report references an unknown user or event")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create report", e)
            }
        })
    }

    async fn update(&self, id: Uuid, patch: &ReportPatch) -> AppResult<Option<Report>> {
        sqlx::query_as::<_, Report>(
            "UPDATE reports SET filters = COALESCE($2, filters), \
                                format = COALESCE($3, format), \
                                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&patch.filters)
        .bind(&patch.format)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update report", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete report", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ReportStore for ReportRepository {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Report>> {
        sqlx::query_as::<_, Report>(
            "SELECT * FROM reports WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list reports by user", e)
        })
    }
}
