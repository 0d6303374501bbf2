//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod pagination;
pub mod path;

pub use auth::{AdminUser, AuthUser, FreshUser};
pub use json::ValidatedJson;
pub use pagination::PaginationParams;
