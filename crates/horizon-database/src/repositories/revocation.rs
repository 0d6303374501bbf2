//! Revoked token repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use horizon_core::error::{AppError, ErrorKind};
use horizon_core::result::AppResult;
use horizon_entity::token::{NewRevocation, RevokedToken};

use crate::store::RevocationStore;

/// Repository for the `revoked_tokens` table.
#[derive(Debug, Clone)]
pub struct RevokedTokenRepository {
    pool: PgPool,
}

impl RevokedTokenRepository {
    /// Create a new revoked token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevocationStore for RevokedTokenRepository {
    async fn find(&self, jti: Uuid) -> AppResult<Option<RevokedToken>> {
        sqlx::query_as::<_, RevokedToken>("SELECT * FROM revoked_tokens WHERE jti = $1")
            .bind(jti)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to look up revoked token", e)
            })
    }

    async fn insert(&self, record: &NewRevocation) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO revoked_tokens (jti, token_type, user_id, expires_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(record.jti)
        .bind(record.token_type)
        .bind(record.user_id)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke token", e))?;
        Ok(result.rows_affected() == 1)
    }
}
