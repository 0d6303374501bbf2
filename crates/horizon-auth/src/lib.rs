//! # horizon-auth
//!
//! Credential verification and token lifecycle for Event Horizon.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and the password composition policy
//! - `jwt`: token claims, issuance and decoding
//! - `revocation`: the durable ledger of revoked token ids
//! - `gate`: per-request authentication, freshness and admin checks
//! - `session`: register, login, refresh, logout and password change flows

pub mod gate;
pub mod jwt;
pub mod password;
pub mod revocation;
pub mod session;

pub use gate::{AuthGate, GateState, Identity};
pub use jwt::{Claims, IdentityClaims, IssuedToken, JwtDecoder, JwtEncoder, TokenPair};
pub use password::{PasswordHasher, PasswordValidator, PolicyViolation, Verification};
pub use revocation::RevocationLedger;
pub use session::{AuthResult, RegisterUser, SessionManager};
