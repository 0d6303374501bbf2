//! Alert operations.

pub mod service;

pub use service::AlertService;
