//! Report entities.

pub mod model;

pub use model::{CreateReport, Report, ReportPatch};
