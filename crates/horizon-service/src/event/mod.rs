//! Event and event data operations.

pub mod service;

pub use service::{EventService, NewEvent, NewEventData};
