//! Session lifecycle flows.

pub mod manager;

pub use manager::{AuthResult, RegisterUser, SessionManager};
