//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

use horizon_core::config::AuthConfig;
use horizon_core::error::{AppError, ErrorKind};

/// Outcome of checking a password against a stored digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    /// Whether the password matched the digest.
    pub matched: bool,
    /// Whether the digest should be replaced with one at the current cost.
    pub rehash_needed: bool,
}

impl Verification {
    fn rejected() -> Self {
        Self {
            matched: false,
            rehash_needed: false,
        }
    }
}

/// Handles password hashing and verification using Argon2id.
///
/// Cost parameters come from [`AuthConfig`]; verification always uses the
/// parameters embedded in the stored digest.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    /// Digest of a throwaway secret at the configured cost, verified against
    /// whenever there is no real digest so every failure costs one Argon2 run.
    dummy_digest: String,
}

/// Plaintext behind `dummy_digest`. It never authenticates anyone.
pub(crate) const DUMMY_SECRET: &str = "horizon-unused-credential";

impl PasswordHasher {
    /// Creates a hasher with the configured Argon2 cost.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Argon2 parameters", e)
        })?;
        let mut hasher = Self {
            params,
            dummy_digest: String::new(),
        };
        hasher.dummy_digest = hasher.hash_password(DUMMY_SECRET)?;
        Ok(hasher)
    }

    /// The placeholder digest used to equalize failure timing.
    pub fn dummy_digest(&self) -> &str {
        &self.dummy_digest
    }

    /// Spends one verification on the placeholder digest and reports a mismatch.
    pub fn reject(&self, password: &str) -> Verification {
        if let Ok(parsed) = PasswordHash::new(&self.dummy_digest) {
            let _ = self.argon2().verify_password(password.as_bytes(), &parsed);
        }
        Verification::rejected()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored digest.
    ///
    /// A malformed digest is reported as a mismatch, never as an error.
    pub fn verify_password(&self, password: &str, digest: &str) -> Verification {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password digest is malformed");
                return self.reject(password);
            }
        };

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Verification {
                matched: true,
                rehash_needed: self.parsed_needs_rehash(&parsed),
            },
            Err(argon2::password_hash::Error::Password) => Verification::rejected(),
            Err(e) => {
                warn!(error = %e, "Password verification could not complete");
                Verification::rejected()
            }
        }
    }

    /// Returns true when the digest is not Argon2id or was produced with a
    /// lower cost than currently configured.
    pub fn needs_rehash(&self, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self.parsed_needs_rehash(&parsed),
            Err(_) => true,
        }
    }

    fn parsed_needs_rehash(&self, parsed: &PasswordHash<'_>) -> bool {
        if parsed.algorithm.as_str() != Algorithm::Argon2id.as_str() {
            return true;
        }
        if parsed.version != Some(Version::V0x13 as u32) {
            return true;
        }
        match Params::try_from(parsed) {
            Ok(stored) => {
                stored.m_cost() < self.params.m_cost()
                    || stored.t_cost() < self.params.t_cost()
                    || stored.p_cost() < self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_config(memory: u32, iterations: u32) -> AuthConfig {
        AuthConfig {
            hash_memory_kib: memory,
            hash_iterations: iterations,
            hash_parallelism: 1,
            ..AuthConfig::default()
        }
    }

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&cheap_config(1024, 1)).unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = hasher();
        let digest = hasher.hash_password("Valid123!").unwrap();
        assert!(digest.starts_with("$argon2id$"));

        let ok = hasher.verify_password("Valid123!", &digest);
        assert!(ok.matched);
        assert!(!ok.rehash_needed);

        assert!(!hasher.verify_password("Valid123?", &digest).matched);
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let hasher = hasher();
        let first = hasher.hash_password("Valid123!").unwrap();
        let second = hasher.hash_password("Valid123!").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify_password("Valid123!", &first).matched);
        assert!(hasher.verify_password("Valid123!", &second).matched);
    }

    #[test]
    fn test_malformed_digest_is_a_mismatch() {
        let hasher = hasher();
        assert_eq!(
            hasher.verify_password("Valid123!", "not-a-digest"),
            Verification::rejected()
        );
        assert!(hasher.needs_rehash("not-a-digest"));
    }

    #[test]
    fn test_dummy_digest_matches_configured_cost() {
        let hasher = hasher();
        assert!(hasher.dummy_digest().starts_with("$argon2id$"));
        assert!(!hasher.needs_rehash(hasher.dummy_digest()));
        assert!(!hasher.reject(DUMMY_SECRET).matched);
    }

    #[test]
    fn test_rehash_when_cost_raised() {
        let weak = hasher();
        let strong = PasswordHasher::new(&cheap_config(2048, 2)).unwrap();
        let digest = weak.hash_password("Valid123!").unwrap();

        assert!(!weak.needs_rehash(&digest));
        assert!(strong.needs_rehash(&digest));

        let result = strong.verify_password("Valid123!", &digest);
        assert!(result.matched);
        assert!(result.rehash_needed);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let config = AuthConfig {
            hash_iterations: 0,
            ..AuthConfig::default()
        };
        let err = PasswordHasher::new(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.source.is_some());
    }
}
