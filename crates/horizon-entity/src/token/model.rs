//! Revocation record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::TokenKind;

/// A durable record that a token id has been explicitly invalidated.
///
/// Records are written once on logout and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RevokedToken {
    /// Row identifier.
    pub id: Uuid,
    /// The revoked token's `jti` claim.
    pub jti: Uuid,
    /// Kind of the revoked token.
    pub token_type: TokenKind,
    /// Owner of the token, when known.
    pub user_id: Option<Uuid>,
    /// Expiry of the revoked token.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the token was revoked.
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a revocation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRevocation {
    /// The token id to revoke.
    pub jti: Uuid,
    /// Kind of the token.
    pub token_type: TokenKind,
    /// Owner of the token, when known.
    pub user_id: Option<Uuid>,
    /// Expiry of the token.
    pub expires_at: Option<DateTime<Utc>>,
}
