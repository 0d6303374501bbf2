//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Placeholder secret shipped in the defaults; refused outside development.
pub const DEFAULT_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";
/// Longest accepted access token lifetime (one week).
pub const MAX_ACCESS_TTL_MINUTES: u64 = 7 * 24 * 60;
/// Longest accepted refresh token lifetime (one year).
pub const MAX_REFRESH_TTL_HOURS: u64 = 365 * 24;

/// Authentication and credential configuration.
///
/// Carries everything the credential subsystem consumes from outside:
/// signing secret, token lifetimes, password bounds and Argon2 cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub jwt_refresh_ttl_hours: u64,
    /// Allowed clock skew when validating `exp`, in seconds.
    #[serde(default = "default_leeway")]
    pub jwt_leeway_seconds: u64,
    /// Minimum password length (characters).
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length (characters).
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_hash_memory")]
    pub hash_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    /// Argon2 degree of parallelism.
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
    /// Name of the cookie carrying the access token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the access token cookie is marked `Secure`.
    #[serde(default)]
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Checks internal consistency of the auth settings.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.len() < 16 {
            return Err(AppError::configuration(
                "auth.jwt_secret must be at least 16 bytes",
            ));
        }
        if !(1..=MAX_ACCESS_TTL_MINUTES).contains(&self.jwt_access_ttl_minutes) {
            return Err(AppError::configuration(format!(
                "auth.jwt_access_ttl_minutes must be between 1 and {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if !(1..=MAX_REFRESH_TTL_HOURS).contains(&self.jwt_refresh_ttl_hours) {
            return Err(AppError::configuration(format!(
                "auth.jwt_refresh_ttl_hours must be between 1 and {MAX_REFRESH_TTL_HOURS}"
            )));
        }
        if self.password_min_length == 0 || self.password_min_length > self.password_max_length {
            return Err(AppError::configuration(
                "auth.password_min_length must be between 1 and auth.password_max_length",
            ));
        }
        if self.hash_iterations == 0 || self.hash_parallelism == 0 {
            return Err(AppError::configuration(
                "auth.hash_iterations and auth.hash_parallelism must be positive",
            ));
        }
        if self.hash_memory_kib < 8 * self.hash_parallelism {
            return Err(AppError::configuration(
                "auth.hash_memory_kib must be at least 8 * auth.hash_parallelism",
            ));
        }
        Ok(())
    }

    /// Returns true while the placeholder signing secret is in use.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_access_ttl_minutes: default_access_ttl(),
            jwt_refresh_ttl_hours: default_refresh_ttl(),
            jwt_leeway_seconds: default_leeway(),
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
            hash_memory_kib: default_hash_memory(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
        }
    }
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_refresh_ttl() -> u64 {
    24
}

fn default_leeway() -> u64 {
    5
}

fn default_password_min() -> usize {
    8
}

fn default_password_max() -> usize {
    24
}

fn default_hash_memory() -> u32 {
    19 * 1024
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

fn default_cookie_name() -> String {
    "access_token".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AuthConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.uses_default_secret());
        assert_eq!(config.jwt_access_ttl_minutes, 60);
        assert_eq!(config.jwt_refresh_ttl_hours, 24);
    }

    #[test]
    fn test_rejects_short_secret() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_token_lifetimes() {
        for minutes in [0, MAX_ACCESS_TTL_MINUTES + 1, u64::MAX] {
            let config = AuthConfig {
                jwt_access_ttl_minutes: minutes,
                ..AuthConfig::default()
            };
            assert!(config.validate().is_err(), "access ttl {minutes}");
        }
        for hours in [0, MAX_REFRESH_TTL_HOURS + 1, u64::MAX] {
            let config = AuthConfig {
                jwt_refresh_ttl_hours: hours,
                ..AuthConfig::default()
            };
            assert!(config.validate().is_err(), "refresh ttl {hours}");
        }
        let edge = AuthConfig {
            jwt_access_ttl_minutes: MAX_ACCESS_TTL_MINUTES,
            jwt_refresh_ttl_hours: MAX_REFRESH_TTL_HOURS,
            ..AuthConfig::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_password_bounds() {
        let config = AuthConfig {
            password_min_length: 30,
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_memory_below_parallelism_floor() {
        let config = AuthConfig {
            hash_memory_kib: 8,
            hash_parallelism: 4,
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
