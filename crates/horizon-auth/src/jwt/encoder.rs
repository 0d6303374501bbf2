//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use horizon_core::config::AuthConfig;
use horizon_core::error::AppError;
use horizon_entity::token::TokenKind;

use super::claims::{Claims, IdentityClaims};

/// A signed token together with the facts needed to revoke it later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// The encoded JWT.
    pub token: String,
    /// Its unique id.
    pub jti: Uuid,
    /// Its expiry.
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Fresh access token.
    pub access: IssuedToken,
    /// Refresh token.
    pub refresh: IssuedToken,
}

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token lifetime.
    access_ttl: Duration,
    /// Refresh token lifetime.
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails when a token lifetime is zero or does not fit a `TimeDelta`.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: lifetime(
                config.jwt_access_ttl_minutes,
                Duration::try_minutes,
                "auth.jwt_access_ttl_minutes",
            )?,
            refresh_ttl: lifetime(
                config.jwt_refresh_ttl_hours,
                Duration::try_hours,
                "auth.jwt_refresh_ttl_hours",
            )?,
        })
    }

    /// Issues an access token. `fresh` marks tokens minted by a primary login.
    pub fn issue_access(
        &self,
        user_id: Uuid,
        identity: &IdentityClaims,
        fresh: bool,
    ) -> Result<IssuedToken, AppError> {
        self.issue(user_id, identity, TokenKind::Access, fresh, self.access_ttl)
    }

    /// Issues a refresh token.
    pub fn issue_refresh(
        &self,
        user_id: Uuid,
        identity: &IdentityClaims,
    ) -> Result<IssuedToken, AppError> {
        self.issue(user_id, identity, TokenKind::Refresh, false, self.refresh_ttl)
    }

    /// Generates a fresh access token and a refresh token for the user.
    pub fn generate_token_pair(
        &self,
        user_id: Uuid,
        identity: &IdentityClaims,
    ) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access: self.issue_access(user_id, identity, true)?,
            refresh: self.issue_refresh(user_id, identity)?,
        })
    }

    /// Signs an arbitrary claims set.
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            AppError::internal(format!(
                "Failed to encode {} token: {e}",
                claims.token_type
            ))
        })
    }

    fn issue(
        &self,
        user_id: Uuid,
        identity: &IdentityClaims,
        kind: TokenKind,
        fresh: bool,
        ttl: Duration,
    ) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::internal(format!("{kind} token expiry overflows")))?;
        let claims = Claims {
            sub: user_id,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            token_type: kind,
            fresh,
            is_admin: identity.is_admin,
            extra: identity.extra.clone(),
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            jti: claims.jti,
            expires_at: claims.expires_at(),
        })
    }
}

fn lifetime(
    value: u64,
    to_duration: fn(i64) -> Option<Duration>,
    key: &str,
) -> Result<Duration, AppError> {
    i64::try_from(value)
        .ok()
        .and_then(to_duration)
        .filter(|ttl| *ttl > Duration::zero())
        .ok_or_else(|| AppError::configuration(format!("{key} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "encoder-test-secret-0123456789".to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_rejects_unrepresentable_lifetimes() {
        let huge = AuthConfig {
            jwt_access_ttl_minutes: u64::MAX,
            ..config()
        };
        assert!(JwtEncoder::new(&huge).is_err());

        let overflowing = AuthConfig {
            jwt_refresh_ttl_hours: i64::MAX as u64,
            ..config()
        };
        assert!(JwtEncoder::new(&overflowing).is_err());

        let zero = AuthConfig {
            jwt_access_ttl_minutes: 0,
            ..config()
        };
        assert!(JwtEncoder::new(&zero).is_err());
    }

    #[test]
    fn test_issued_tokens_expire_in_the_future() {
        let encoder = JwtEncoder::new(&config()).unwrap();
        let pair = encoder
            .generate_token_pair(Uuid::new_v4(), &IdentityClaims::default())
            .unwrap();
        let now = Utc::now();
        assert!(pair.access.expires_at > now);
        assert!(pair.refresh.expires_at > pair.access.expires_at);
    }
}
