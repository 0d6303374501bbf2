//! Time-series data points attached to an event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single data point recorded for an event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventData {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning event; rows are removed with the event.
    pub event_id: Uuid,
    /// Arbitrary JSON payload.
    pub data: serde_json::Value,
    /// When the data point was observed.
    pub timestamp: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Data required to record an event data point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventData {
    /// Owning event.
    pub event_id: Uuid,
    /// JSON payload.
    pub data: serde_json::Value,
    /// Observation time.
    pub timestamp: DateTime<Utc>,
}

/// Mutable event data fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventDataPatch {
    /// New payload.
    pub data: Option<serde_json::Value>,
    /// New observation time.
    pub timestamp: Option<DateTime<Utc>>,
}

impl EventDataPatch {
    /// Applies the patch to an in-memory data point.
    pub fn apply(&self, row: &mut EventData) {
        if let Some(data) = &self.data {
            row.data = data.clone();
        }
        if let Some(timestamp) = self.timestamp {
            row.timestamp = timestamp;
        }
    }
}
