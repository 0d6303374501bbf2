//! # horizon-entity
//!
//! Domain entity models for Event Horizon. Every struct in this crate
//! represents a database table row, an insert payload, or a typed patch.
//! Row types derive `sqlx::FromRow`.

pub mod alert;
pub mod event;
pub mod report;
pub mod token;
pub mod user;
