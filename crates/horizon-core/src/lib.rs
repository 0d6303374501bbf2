//! # horizon-core
//!
//! Core crate for Event Horizon. Contains configuration schemas,
//! pagination types, the generic repository trait, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Event Horizon crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
