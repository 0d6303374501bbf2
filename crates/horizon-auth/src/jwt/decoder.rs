//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use horizon_core::config::AuthConfig;
use horizon_core::error::AppError;
use horizon_entity::token::TokenKind;

use super::claims::Claims;

/// Validates JWT signatures, expiry and token kind.
///
/// Revocation is checked separately by the [`crate::gate::AuthGate`].
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_kind(token, TokenKind::Access)
    }

    /// Decodes and validates a refresh token string.
    pub fn decode_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_kind(token, TokenKind::Refresh)
    }

    fn decode_kind(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;
        if claims.token_type != expected {
            return Err(AppError::unauthorized(format!(
                "Invalid token type: expected {expected} token"
            )));
        }
        Ok(claims)
    }

    /// Decode without type checking.
    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized("Invalid token"),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::jwt::{IdentityClaims, JwtEncoder};

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-with-enough-bytes".to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_roundtrip_preserves_claims() {
        let encoder = JwtEncoder::new(&config()).unwrap();
        let decoder = JwtDecoder::new(&config());
        let user_id = Uuid::new_v4();
        let identity = IdentityClaims {
            is_admin: true,
            ..IdentityClaims::default()
        }
        .with_claim("tenant", serde_json::json!("north"));

        let pair = encoder.generate_token_pair(user_id, &identity).unwrap();
        let access = decoder.decode_access_token(&pair.access.token).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.jti, pair.access.jti);
        assert!(access.fresh);
        assert!(access.is_admin);
        assert_eq!(access.extra["tenant"], "north");

        let refresh = decoder.decode_refresh_token(&pair.refresh.token).unwrap();
        assert_eq!(refresh.token_type, TokenKind::Refresh);
        assert!(!refresh.fresh);
        assert_ne!(refresh.jti, access.jti);
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let encoder = JwtEncoder::new(&config()).unwrap();
        let decoder = JwtDecoder::new(&config());
        let pair = encoder
            .generate_token_pair(Uuid::new_v4(), &IdentityClaims::default())
            .unwrap();
        assert!(decoder.decode_access_token(&pair.refresh.token).is_err());
        assert!(decoder.decode_refresh_token(&pair.access.token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let encoder = JwtEncoder::new(&config()).unwrap();
        let decoder = JwtDecoder::new(&config());
        let issued = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4(),
            jti: Uuid::new_v4(),
            iat: issued.timestamp(),
            exp: (issued + Duration::hours(1)).timestamp(),
            token_type: TokenKind::Access,
            fresh: true,
            is_admin: false,
            extra: Default::default(),
        };
        let token = encoder.sign(&claims).unwrap();
        let err = decoder.decode_access_token(&token).unwrap_err();
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let other = AuthConfig {
            jwt_secret: "another-secret-entirely-here".to_string(),
            ..AuthConfig::default()
        };
        let token = JwtEncoder::new(&other)
            .unwrap()
            .issue_access(Uuid::new_v4(), &IdentityClaims::default(), true)
            .unwrap();
        let decoder = JwtDecoder::new(&config());
        assert!(decoder.decode_access_token(&token.token).is_err());
        assert!(decoder.decode_access_token("garbage").is_err());
    }
}
