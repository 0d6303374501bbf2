//! In-memory revocation store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use horizon_core::result::AppResult;
use horizon_entity::token::{NewRevocation, RevokedToken};

use crate::store::RevocationStore;

/// Revocation records keyed by token id.
#[derive(Debug, Clone, Default)]
pub struct MemoryRevocationStore {
    records: Arc<RwLock<HashMap<Uuid, RevokedToken>>>,
}

impl MemoryRevocationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of revoked token ids.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no token has been revoked.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn find(&self, jti: Uuid) -> AppResult<Option<RevokedToken>> {
        Ok(self.records.read().await.get(&jti).cloned())
    }

    async fn insert(&self, record: &NewRevocation) -> AppResult<bool> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.jti) {
            return Ok(false);
        }
        records.insert(
            record.jti,
            RevokedToken {
                id: Uuid::new_v4(),
                jti: record.jti,
                token_type: record.token_type,
                user_id: record.user_id,
                expires_at: record.expires_at,
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_entity::token::TokenKind;

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let store = MemoryRevocationStore::new();
        let record = NewRevocation {
            jti: Uuid::new_v4(),
            token_type: TokenKind::Access,
            user_id: Some(Uuid::new_v4()),
            expires_at: None,
        };
        assert!(store.insert(&record).await.unwrap());
        assert!(!store.insert(&record).await.unwrap());
        assert_eq!(store.len().await, 1);

        let found = store.find(record.jti).await.unwrap().unwrap();
        assert_eq!(found.token_type, TokenKind::Access);
        assert!(store.find(Uuid::new_v4()).await.unwrap().is_none());
    }
}
