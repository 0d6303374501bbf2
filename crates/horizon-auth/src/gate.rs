//! Per-request authentication and authorization checks.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use horizon_core::error::AppError;

use crate::jwt::{Claims, JwtDecoder};
use crate::revocation::RevocationLedger;

/// Authentication state of a request carrying a valid access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Valid token obtained from a refresh exchange.
    AuthenticatedStale,
    /// Valid token obtained from a primary login.
    AuthenticatedFresh,
}

/// The authenticated caller, derived from verified access token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// User ID.
    pub user_id: Uuid,
    /// Access token id.
    pub jti: Uuid,
    /// Administrative flag baked into the token.
    pub is_admin: bool,
    /// Whether the token came from a primary login.
    pub fresh: bool,
    /// Access token expiry.
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    /// Builds an identity from verified claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            jti: claims.jti,
            is_admin: claims.is_admin,
            fresh: claims.fresh,
            expires_at: claims.expires_at(),
        }
    }

    /// The request's authentication state.
    pub fn state(&self) -> GateState {
        if self.fresh {
            GateState::AuthenticatedFresh
        } else {
            GateState::AuthenticatedStale
        }
    }
}

/// Answers "is this request authenticated, and as whom".
#[derive(Debug, Clone)]
pub struct AuthGate {
    decoder: JwtDecoder,
    ledger: RevocationLedger,
}

impl AuthGate {
    /// Creates a gate from a decoder and the revocation ledger.
    pub fn new(decoder: JwtDecoder, ledger: RevocationLedger) -> Self {
        Self { decoder, ledger }
    }

    /// Verifies an access token and checks it has not been revoked.
    pub async fn authenticate(&self, token: &str) -> Result<Identity, AppError> {
        let claims = self.decoder.decode_access_token(token)?;
        self.ensure_not_revoked(&claims).await?;
        Ok(Identity::from_claims(&claims))
    }

    /// Verifies a refresh token and checks it has not been revoked.
    pub async fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decoder.decode_refresh_token(token)?;
        self.ensure_not_revoked(&claims).await?;
        Ok(claims)
    }

    /// Rejects identities whose token did not come from a primary login.
    pub fn require_fresh(&self, identity: &Identity) -> Result<(), AppError> {
        match identity.state() {
            GateState::AuthenticatedFresh => Ok(()),
            GateState::AuthenticatedStale => Err(AppError::forbidden("Fresh token required")),
        }
    }

    /// Rejects identities without the administrative flag.
    pub fn require_admin(&self, identity: &Identity) -> Result<(), AppError> {
        if identity.is_admin {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin access required"))
        }
    }

    async fn ensure_not_revoked(&self, claims: &Claims) -> Result<(), AppError> {
        match self.ledger.is_revoked(claims.jti).await {
            Ok(false) => Ok(()),
            Ok(true) => Err(AppError::unauthorized("Token has been revoked")),
            Err(e) => {
                error!(jti = %claims.jti, error = %e, "Revocation check failed");
                Err(AppError::unauthorized("Token could not be verified"))
            }
        }
    }
}
