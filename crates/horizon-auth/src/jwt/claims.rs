//! JWT claims structure used in access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use horizon_entity::token::TokenKind;
use horizon_entity::user::User;

/// JWT claims payload embedded in every token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user ID.
    pub sub: Uuid,
    /// JWT ID tracked by the revocation ledger.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Access or refresh.
    pub token_type: TokenKind,
    /// Set only on access tokens minted by a primary login.
    #[serde(default)]
    pub fresh: bool,
    /// Administrative flag at the time of issuance.
    #[serde(default)]
    pub is_admin: bool,
    /// Additional claims supplied at issuance.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Authorization claims baked into a token at issuance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityClaims {
    /// Administrative flag.
    pub is_admin: bool,
    /// Arbitrary additional claims.
    pub extra: Map<String, Value>,
}

impl IdentityClaims {
    /// Claims derived from the current user record.
    pub fn for_user(user: &User) -> Self {
        Self {
            is_admin: user.is_admin,
            extra: Map::new(),
        }
    }

    /// Adds an extra claim.
    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
