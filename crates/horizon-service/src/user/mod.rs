//! User administration and profile operations.

pub mod service;

pub use service::{UserDetail, UserService};
