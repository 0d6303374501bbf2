//! In-memory user store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use horizon_core::error::AppError;
use horizon_core::result::AppResult;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_entity::user::{CreateUser, User, UserPatch};

use super::newest_first_page;
use crate::store::UserStore;

/// In-memory user table.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    rows: Arc<RwLock<Vec<User>>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(rows: &[User], email: &str, except: Option<Uuid>) -> bool {
    rows.iter()
        .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
}

#[async_trait]
impl Repository<User, CreateUser, UserPatch> for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let rows = self.rows.read().await;
        Ok(newest_first_page(&rows, page))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut rows = self.rows.write().await;
        if email_taken(&rows, &data.email, None) {
            return Err(AppError::conflict("Email already registered"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email.clone(),
            fname: data.fname.clone(),
            lname: data.lname.clone(),
            password_hash: data.password_hash.clone(),
            is_admin: data.is_admin,
            created_at: now,
            updated_at: now,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> AppResult<Option<User>> {
        let mut rows = self.rows.write().await;
        if let Some(email) = &patch.email {
            if email_taken(&rows, email, Some(id)) {
                return Err(AppError::conflict("Email already registered"));
            }
        }
        Ok(rows.iter_mut().find(|u| u.id == id).map(|user| {
            patch.apply(user);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok(rows.len() < before)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        Ok(match rows.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn set_admin(&self, id: Uuid, is_admin: bool) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        Ok(match rows.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.is_admin = is_admin;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::error::ErrorKind;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            fname: Some("Ada".to_string()),
            lname: None,
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = MemoryUserStore::new();
        store.create(&new_user("ada@example.com")).await.unwrap();
        let err = store
            .create(&new_user("ADA@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_find_by_email_ignores_case() {
        let store = MemoryUserStore::new();
        let created = store.create(&new_user("ada@example.com")).await.unwrap();
        let found = store.find_by_email("Ada@Example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryUserStore::new();
        let user = store.create(&new_user("ada@example.com")).await.unwrap();
        let other = store.create(&new_user("bob@example.com")).await.unwrap();

        let patch = UserPatch {
            email: Some("bob@example.com".to_string()),
            ..UserPatch::default()
        };
        assert!(store.update(user.id, &patch).await.is_err());

        let patch = UserPatch {
            lname: Some("Lovelace".to_string()),
            ..UserPatch::default()
        };
        let updated = store.update(user.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.lname.as_deref(), Some("Lovelace"));
        assert_eq!(updated.fname.as_deref(), Some("Ada"));

        assert!(store.set_admin(other.id, true).await.unwrap());
        assert!(store.find_by_id(other.id).await.unwrap().unwrap().is_admin);

        assert!(store.delete(user.id).await.unwrap());
        assert!(!store.delete(user.id).await.unwrap());
        assert!(store.update(user.id, &patch).await.unwrap().is_none());
    }
}
