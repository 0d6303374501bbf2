//! Alert entities.

pub mod model;

pub use model::{Alert, AlertPatch, CreateAlert};
