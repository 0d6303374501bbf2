//! Revocation ledger backed by a [`RevocationStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use horizon_core::error::AppError;
use horizon_database::store::RevocationStore;
use horizon_entity::token::{NewRevocation, TokenKind};

/// Records revoked token ids and answers whether a token id is revoked.
///
/// Records are never expunged, so a revoked id stays revoked for good.
#[derive(Clone)]
pub struct RevocationLedger {
    store: Arc<dyn RevocationStore>,
}

impl std::fmt::Debug for RevocationLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevocationLedger").finish_non_exhaustive()
    }
}

impl RevocationLedger {
    /// Creates a ledger over the given store.
    pub fn new(store: Arc<dyn RevocationStore>) -> Self {
        Self { store }
    }

    /// Revokes a token id. Revoking an already revoked id succeeds.
    pub async fn revoke(
        &self,
        jti: Uuid,
        kind: TokenKind,
        owner: Option<Uuid>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let inserted = self
            .store
            .insert(&NewRevocation {
                jti,
                token_type: kind,
                user_id: owner,
                expires_at,
            })
            .await?;

        if inserted {
            info!(jti = %jti, kind = %kind, "Token revoked");
        } else {
            debug!(jti = %jti, "Token was already revoked");
        }
        Ok(())
    }

    /// Returns true when the token id has been revoked.
    pub async fn is_revoked(&self, jti: Uuid) -> Result<bool, AppError> {
        Ok(self.store.find(jti).await?.is_some())
    }
}
