//! Route handlers organized by domain.

pub mod alerts;
pub mod auth;
pub mod events;
pub mod info;
pub mod reports;
pub mod users;
