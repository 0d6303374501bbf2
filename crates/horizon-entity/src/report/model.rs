//! Report entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A saved report definition over an event's data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    /// Unique report identifier.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Reported event.
    pub event_id: Uuid,
    /// Filters applied to the event data, as a JSON object.
    pub filters: serde_json::Value,
    /// Output format (e.g. `csv`, `json`).
    pub format: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReport {
    /// Owner.
    pub user_id: Uuid,
    /// Reported event.
    pub event_id: Uuid,
    /// Filters object.
    pub filters: serde_json::Value,
    /// Output format.
    pub format: String,
}

/// Mutable report fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportPatch {
    /// New filters.
    pub filters: Option<serde_json::Value>,
    /// New format.
    pub format: Option<String>,
}

impl ReportPatch {
    /// Applies the patch to an in-memory report.
    pub fn apply(&self, report: &mut Report) {
        if let Some(filters) = &self.filters {
            report.filters = filters.clone();
        }
        if let Some(format) = &self.format {
            report.format = format.clone();
        }
    }
}
