//! Session lifecycle manager: registration, login, refresh, logout and
//! password change.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use horizon_core::config::AuthConfig;
use horizon_core::error::AppError;
use horizon_core::traits::Repository;
use horizon_database::store::UserStore;
use horizon_entity::token::TokenKind;
use horizon_entity::user::{CreateUser, User};

use crate::gate::{AuthGate, Identity};
use crate::jwt::{IdentityClaims, IssuedToken, JwtDecoder, JwtEncoder, TokenPair};
use crate::password::{PasswordHasher, PasswordValidator, Verification};
use crate::revocation::RevocationLedger;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Input for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    /// Email address.
    pub email: String,
    /// Plaintext password, checked against the policy.
    pub password: String,
    /// First name.
    pub fname: Option<String>,
    /// Last name.
    pub lname: Option<String>,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    /// The authenticated user.
    pub user: User,
    /// Generated token pair.
    pub tokens: TokenPair,
}

/// Orchestrates the credential flows over the user store.
#[derive(Clone)]
pub struct SessionManager {
    /// User persistence.
    users: Arc<dyn UserStore>,
    /// Password hasher.
    hasher: PasswordHasher,
    /// Password policy.
    validator: PasswordValidator,
    /// JWT encoder for token generation.
    encoder: JwtEncoder,
    /// JWT decoder for refresh tokens presented at logout.
    decoder: JwtDecoder,
    /// Request gate.
    gate: Arc<AuthGate>,
    /// Revocation ledger.
    ledger: RevocationLedger,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("hasher", &self.hasher)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a session manager wired to the given stores.
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserStore>,
        gate: Arc<AuthGate>,
        ledger: RevocationLedger,
    ) -> Result<Self, AppError> {
        Ok(Self {
            users,
            hasher: PasswordHasher::new(config)?,
            validator: PasswordValidator::new(config),
            encoder: JwtEncoder::new(config)?,
            decoder: JwtDecoder::new(config),
            gate,
            ledger,
        })
    }

    /// Returns the request gate.
    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    /// Creates an account after enforcing the policy and email uniqueness.
    pub async fn provision(&self, input: RegisterUser, is_admin: bool) -> Result<User, AppError> {
        self.validator.validate(&input.password)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = self.hash_blocking(input.password).await?;
        let user = self
            .users
            .create(&CreateUser {
                email: input.email,
                password_hash,
                fname: input.fname,
                lname: input.lname,
                is_admin,
            })
            .await?;

        info!(user_id = %user.id, is_admin = user.is_admin, "User created");
        Ok(user)
    }

    /// Registers a new user and returns a fresh token pair.
    pub async fn register(&self, input: RegisterUser) -> Result<AuthResult, AppError> {
        let user = self.provision(input, false).await?;
        let tokens = self
            .encoder
            .generate_token_pair(user.id, &IdentityClaims::for_user(&user))?;
        Ok(AuthResult { user, tokens })
    }

    /// Verifies credentials and returns a fresh token pair.
    ///
    /// A digest produced at a lower cost than configured is replaced.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AppError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                self.reject_blocking(password.to_string()).await;
                warn!(email = %email, "Login attempt for unknown email");
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        let verification = self
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await?;
        if !verification.matched {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if verification.rehash_needed {
            self.rehash(&user, password.to_string()).await;
        }

        let tokens = self
            .encoder
            .generate_token_pair(user.id, &IdentityClaims::for_user(&user))?;
        info!(user_id = %user.id, "Login successful");
        Ok(AuthResult { user, tokens })
    }

    /// Exchanges a refresh token for a non-fresh access token.
    ///
    /// The admin flag is re-read so privilege changes apply on refresh.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, AppError> {
        let claims = self.gate.verify_refresh(refresh_token).await?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

        let identity = IdentityClaims {
            is_admin: user.is_admin,
            extra: claims.extra,
        };
        let token = self.encoder.issue_access(user.id, &identity, false)?;
        info!(user_id = %user.id, "Access token refreshed");
        Ok(token)
    }

    /// Revokes the caller's access token, and the refresh token when one is
    /// supplied and belongs to the same user.
    pub async fn logout(
        &self,
        identity: &Identity,
        refresh_token: Option<&str>,
    ) -> Result<(), AppError> {
        self.ledger
            .revoke(
                identity.jti,
                TokenKind::Access,
                Some(identity.user_id),
                Some(identity.expires_at),
            )
            .await?;

        if let Some(token) = refresh_token {
            match self.decoder.decode_refresh_token(token) {
                Ok(claims) if claims.sub == identity.user_id => {
                    self.ledger
                        .revoke(
                            claims.jti,
                            TokenKind::Refresh,
                            Some(claims.sub),
                            Some(claims.expires_at()),
                        )
                        .await?;
                }
                Ok(claims) => {
                    warn!(
                        user_id = %identity.user_id,
                        owner_id = %claims.sub,
                        "Refresh token presented at logout belongs to another user"
                    );
                }
                Err(e) => {
                    warn!(user_id = %identity.user_id, error = %e, "Ignoring unusable refresh token at logout");
                }
            }
        }

        info!(user_id = %identity.user_id, "Logout successful");
        Ok(())
    }

    /// Changes the caller's password. Requires a fresh token.
    pub async fn change_password(
        &self,
        identity: &Identity,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        self.gate.require_fresh(identity)?;

        let user = self
            .users
            .find_by_id(identity.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", identity.user_id)))?;

        let verification = self
            .verify_blocking(current_password.to_string(), user.password_hash.clone())
            .await?;
        if !verification.matched {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        self.validator
            .validate_not_same(current_password, new_password)?;
        self.validator.validate(new_password)?;

        let password_hash = self.hash_blocking(new_password.to_string()).await?;
        self.users.update_password(user.id, &password_hash).await?;

        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    async fn rehash(&self, user: &User, password: String) {
        let outcome = match self.hash_blocking(password).await {
            Ok(digest) => self.users.update_password(user.id, &digest).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(_) => info!(user_id = %user.id, "Password digest upgraded"),
            Err(e) => warn!(user_id = %user.id, error = %e, "Password digest upgrade failed"),
        }
    }

    async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| {
                error!(error = %e, "Hashing task failed");
                AppError::internal("Password hashing failed")
            })?
    }

    /// Burns one verification so unknown accounts fail as slowly as known ones.
    async fn reject_blocking(&self, password: String) {
        let hasher = self.hasher.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || hasher.reject(&password)).await {
            error!(error = %e, "Verification task failed");
        }
    }

    async fn verify_blocking(
        &self,
        password: String,
        digest: String,
    ) -> Result<Verification, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &digest))
            .await
            .map_err(|e| {
                error!(error = %e, "Verification task failed");
                AppError::unauthorized(INVALID_CREDENTIALS)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::error::ErrorKind;
    use horizon_database::memory::{MemoryRevocationStore, MemoryUserStore};

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "session-test-secret-0123456789".to_string(),
            hash_memory_kib: 1024,
            hash_iterations: 1,
            ..AuthConfig::default()
        }
    }

    fn manager_with(config: &AuthConfig, users: Arc<MemoryUserStore>) -> SessionManager {
        let ledger = RevocationLedger::new(Arc::new(MemoryRevocationStore::new()));
        let gate = Arc::new(AuthGate::new(JwtDecoder::new(config), ledger.clone()));
        SessionManager::new(config, users, gate, ledger).unwrap()
    }

    fn manager() -> SessionManager {
        manager_with(&config(), Arc::new(MemoryUserStore::new()))
    }

    fn registration(email: &str) -> RegisterUser {
        RegisterUser {
            email: email.to_string(),
            password: "Password1234!".to_string(),
            fname: Some("Ada".to_string()),
            lname: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let manager = manager();
        let registered = manager.register(registration("ada@example.com")).await.unwrap();
        assert!(!registered.user.is_admin);

        let login = manager
            .login("ada@example.com", "Password1234!")
            .await
            .unwrap();
        assert_eq!(login.user.id, registered.user.id);

        let identity = manager
            .gate()
            .authenticate(&login.tokens.access.token)
            .await
            .unwrap();
        assert!(identity.fresh);
    }

    #[tokio::test]
    async fn test_register_rejects_policy_and_duplicates() {
        let manager = manager();
        let mut weak = registration("weak@example.com");
        weak.password = "short1!".to_string();
        let err = manager.register(weak).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        manager.register(registration("ada@example.com")).await.unwrap();
        let err = manager
            .register(registration("ada@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let manager = manager();
        manager.register(registration("ada@example.com")).await.unwrap();

        let unknown = manager
            .login("nobody@example.com", "Password1234!")
            .await
            .unwrap_err();
        let wrong = manager
            .login("ada@example.com", "Password1234?")
            .await
            .unwrap_err();
        assert_eq!(unknown.kind, ErrorKind::Unauthorized);
        assert_eq!(unknown.message, wrong.message);
    }

    #[tokio::test]
    async fn test_placeholder_digest_never_authenticates() {
        let users = Arc::new(MemoryUserStore::new());
        let manager = manager_with(&config(), users.clone());
        users
            .create(&CreateUser {
                email: "broken@example.com".to_string(),
                password_hash: "not-a-phc-string".to_string(),
                fname: None,
                lname: None,
                is_admin: false,
            })
            .await
            .unwrap();

        let unknown = manager
            .login("nobody@example.com", crate::password::hasher::DUMMY_SECRET)
            .await
            .unwrap_err();
        let broken = manager
            .login("broken@example.com", crate::password::hasher::DUMMY_SECRET)
            .await
            .unwrap_err();
        assert_eq!(unknown.kind, ErrorKind::Unauthorized);
        assert_eq!(broken.kind, ErrorKind::Unauthorized);
        assert_eq!(unknown.message, broken.message);
    }

    #[tokio::test]
    async fn test_refresh_yields_stale_token() {
        let manager = manager();
        let result = manager.register(registration("ada@example.com")).await.unwrap();

        let refreshed = manager.refresh(&result.tokens.refresh.token).await.unwrap();
        let identity = manager.gate().authenticate(&refreshed.token).await.unwrap();
        assert!(!identity.fresh);

        // access tokens cannot be exchanged
        assert!(manager.refresh(&result.tokens.access.token).await.is_err());
    }

    #[tokio::test]
    async fn test_refresh_rereads_admin_flag() {
        let users = Arc::new(MemoryUserStore::new());
        let manager = manager_with(&config(), users.clone());
        let result = manager.register(registration("ada@example.com")).await.unwrap();
        users.set_admin(result.user.id, true).await.unwrap();

        let refreshed = manager.refresh(&result.tokens.refresh.token).await.unwrap();
        let identity = manager.gate().authenticate(&refreshed.token).await.unwrap();
        assert!(identity.is_admin);
    }

    #[tokio::test]
    async fn test_logout_revokes_access_and_refresh() {
        let manager = manager();
        let result = manager.register(registration("ada@example.com")).await.unwrap();
        let identity = manager
            .gate()
            .authenticate(&result.tokens.access.token)
            .await
            .unwrap();

        manager
            .logout(&identity, Some(&result.tokens.refresh.token))
            .await
            .unwrap();
        // second logout with the same token is a no-op success
        manager.logout(&identity, None).await.unwrap();

        let err = manager
            .gate()
            .authenticate(&result.tokens.access.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert!(manager.refresh(&result.tokens.refresh.token).await.is_err());
    }

    #[tokio::test]
    async fn test_change_password_requires_fresh_token() {
        let manager = manager();
        let result = manager.register(registration("ada@example.com")).await.unwrap();

        let refreshed = manager.refresh(&result.tokens.refresh.token).await.unwrap();
        let stale = manager.gate().authenticate(&refreshed.token).await.unwrap();
        let err = manager
            .change_password(&stale, "Password1234!", "NewPassword1!")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let fresh = manager
            .gate()
            .authenticate(&result.tokens.access.token)
            .await
            .unwrap();
        let err = manager
            .change_password(&fresh, "Password1234!", "Password1234!")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        manager
            .change_password(&fresh, "Password1234!", "NewPassword1!")
            .await
            .unwrap();
        assert!(manager.login("ada@example.com", "NewPassword1!").await.is_ok());
        assert!(manager.login("ada@example.com", "Password1234!").await.is_err());
    }

    #[tokio::test]
    async fn test_login_upgrades_weak_digest() {
        let users = Arc::new(MemoryUserStore::new());
        let weak = manager_with(&config(), users.clone());
        let registered = weak.register(registration("ada@example.com")).await.unwrap();
        let before = registered.user.password_hash.clone();

        let stronger = AuthConfig {
            hash_memory_kib: 2048,
            hash_iterations: 2,
            ..config()
        };
        let strong = manager_with(&stronger, users.clone());
        strong.login("ada@example.com", "Password1234!").await.unwrap();

        let after = users.find_by_id(registered.user.id).await.unwrap().unwrap();
        assert_ne!(after.password_hash, before);
        assert!(!PasswordHasher::new(&stronger)
            .unwrap()
            .needs_rehash(&after.password_hash));
    }
}
