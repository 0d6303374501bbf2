//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use horizon_auth::Identity;
use horizon_core::error::AppError;

/// Context for the current authenticated request.
///
/// Built from the verified token identity and passed into service methods
/// so that every operation knows who is acting.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The access token id.
    pub token_id: Uuid,
    /// Administrative flag from the token.
    pub is_admin: bool,
    /// Whether the token came from a primary login.
    pub fresh: bool,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a verified identity.
    pub fn new(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id,
            token_id: identity.jti,
            is_admin: identity.is_admin,
            fresh: identity.fresh,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Fails unless the caller owns the resource or is an admin.
    pub fn ensure_owner_or_admin(&self, owner_id: Uuid, resource: &str) -> Result<(), AppError> {
        if self.is_admin || self.user_id == owner_id {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Only the owner or an admin may modify this {resource}"
            )))
        }
    }
}

impl From<&Identity> for RequestContext {
    fn from(identity: &Identity) -> Self {
        Self::new(identity)
    }
}
