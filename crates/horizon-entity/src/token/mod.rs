//! Token kinds and revocation records.

pub mod kind;
pub mod model;

pub use kind::TokenKind;
pub use model::{NewRevocation, RevokedToken};
