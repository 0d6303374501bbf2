//! # horizon-service
//!
//! Business logic service layer for Event Horizon. Each service orchestrates
//! the store traits and the auth session manager to implement
//! application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod alert;
pub mod context;
pub mod event;
pub mod report;
pub mod user;

pub use alert::AlertService;
pub use context::RequestContext;
pub use event::{EventService, NewEvent, NewEventData};
pub use report::ReportService;
pub use user::{UserDetail, UserService};
