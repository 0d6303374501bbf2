//! Event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A scheduled event authored by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,
    /// Event name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Start of the event window.
    pub start_date: DateTime<Utc>,
    /// End of the event window.
    pub end_date: DateTime<Utc>,
    /// The user who created the event.
    pub author_id: Uuid,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
    /// When the event was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEvent {
    /// Event name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Start date.
    pub start_date: DateTime<Utc>,
    /// End date.
    pub end_date: DateTime<Utc>,
    /// Authoring user.
    pub author_id: Uuid,
}

/// Mutable event fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New start date.
    pub start_date: Option<DateTime<Utc>>,
    /// New end date.
    pub end_date: Option<DateTime<Utc>>,
}

impl EventPatch {
    /// Applies the patch to an in-memory event.
    pub fn apply(&self, event: &mut Event) {
        if let Some(name) = &self.name {
            event.name = name.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(start) = self.start_date {
            event.start_date = start;
        }
        if let Some(end) = self.end_date {
            event.end_date = end;
        }
    }
}
