//! User operations: listing, creation, lookup, profile updates and removal.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use horizon_auth::{RegisterUser, SessionManager};
use horizon_core::error::AppError;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_database::store::{ReportStore, UserStore};
use horizon_entity::report::Report;
use horizon_entity::user::{User, UserPatch};

use crate::context::RequestContext;

/// A user with optionally embedded reports.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    /// The user.
    pub user: User,
    /// The user's reports, when requested.
    pub reports: Option<Vec<Report>>,
}

/// Handles user administration and profile operations.
#[derive(Clone)]
pub struct UserService {
    /// User persistence.
    users: Arc<dyn UserStore>,
    /// Report persistence, for embedding.
    reports: Arc<dyn ReportStore>,
    /// Session manager, for credential-aware creation.
    sessions: Arc<SessionManager>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        reports: Arc<dyn ReportStore>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            users,
            reports,
            sessions,
        }
    }

    /// Lists users. Admin only.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        require_admin(ctx)?;
        self.users.find_all(page).await
    }

    /// Creates a user on behalf of an admin.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: RegisterUser,
        is_admin: bool,
    ) -> Result<User, AppError> {
        require_admin(ctx)?;
        let user = self.sessions.provision(input, is_admin).await?;
        info!(admin_id = %ctx.user_id, user_id = %user.id, "User created by admin");
        Ok(user)
    }

    /// Fetches a user, optionally with their reports.
    pub async fn get(&self, id: Uuid, with_reports: bool) -> Result<UserDetail, AppError> {
        let user = self.find(id).await?;
        let reports = if with_reports {
            Some(self.reports.find_by_user(id).await?)
        } else {
            None
        };
        Ok(UserDetail { user, reports })
    }

    /// Fetches the caller's own record.
    pub async fn me(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.find(ctx.user_id).await
    }

    /// Applies a profile patch. The caller must be the user or an admin.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: &UserPatch,
    ) -> Result<User, AppError> {
        ctx.ensure_owner_or_admin(id, "user")?;
        if patch.is_empty() {
            return self.find(id).await;
        }

        let user = self
            .users
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(actor_id = %ctx.user_id, user_id = %id, "User updated");
        Ok(user)
    }

    /// Deletes a user. Admin only.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        require_admin(ctx)?;
        if !self.users.delete(id).await? {
            return Err(not_found(id));
        }
        info!(admin_id = %ctx.user_id, user_id = %id, "User deleted");
        Ok(())
    }

    /// Sets the admin flag for the user with the given email.
    pub async fn set_admin_by_email(&self, email: &str, is_admin: bool) -> Result<User, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No user with email {email}")))?;
        self.users.set_admin(user.id, is_admin).await?;
        info!(user_id = %user.id, is_admin, "Admin flag updated");
        self.find(user.id).await
    }

    async fn find(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("User {id} not found"))
}

fn require_admin(ctx: &RequestContext) -> Result<(), AppError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("Admin access required"))
    }
}
