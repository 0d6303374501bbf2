//! Alert repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use horizon_core::error::{AppError, ErrorKind};
use horizon_core::result::AppResult;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_entity::alert::{Alert, AlertPatch, CreateAlert};

use super::is_foreign_key_violation;
use crate::store::AlertStore;

/// Repository for the `alerts` table.
#[derive(Debug, Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    /// Create a new alert repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn reference_error(e: sqlx::Error, context: &'static str) -> AppError {
    if is_foreign_key_violation(&e) {
        AppError::validation("Alert references an unknown user or event")
    } else {
        AppError::with_source(ErrorKind::Database, context, e)
    }
}

#[async_trait]
impl Repository<Alert, CreateAlert, AlertPatch> for AlertRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>> {
        sqlx::query_as::<_, Alert>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find alert", e))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Alert>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alerts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count alerts", e))?;

        let alerts = sqlx::query_as::<_, Alert>(
            "SELECT * FROM alerts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list alerts", e))?;

        Ok(PageResponse::new(alerts, page, total as u64))
    }

    async fn create(&self, data: &CreateAlert) -> AppResult<Alert> {
        sqlx::query_as::<_, Alert>(
            "INSERT INTO alerts (user_id, event_id, condition) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.event_id)
        .bind(&data.condition)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| reference_error(e, "Failed to create alert"))
    }

    async fn update(&self, id: Uuid, patch: &AlertPatch) -> AppResult<Option<Alert>> {
        sqlx::query_as::<_, Alert>(
            "UPDATE alerts SET event_id = COALESCE($2, event_id), \
                               condition = COALESCE($3, condition), \
                               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.event_id)
        .bind(&patch.condition)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| reference_error(e, "Failed to update alert"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete alert", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AlertStore for AlertRepository {
    async fn find_by_event(&self, event_id: Uuid) -> AppResult<Vec<Alert>> {
        sqlx::query_as::<_, Alert>(
            "SELECT * FROM alerts WHERE event_id = $1 ORDER BY created_at DESC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list alerts by event", e)
        })
    }
}
