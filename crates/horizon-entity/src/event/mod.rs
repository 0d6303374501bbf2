//! Event and event data entities.

pub mod data;
pub mod model;

pub use data::{CreateEventData, EventData, EventDataPatch};
pub use model::{CreateEvent, Event, EventPatch};
