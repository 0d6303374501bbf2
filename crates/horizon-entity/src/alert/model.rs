//! Alert entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user-defined condition watched on an event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    /// Unique alert identifier.
    pub id: Uuid,
    /// User to notify.
    pub user_id: Uuid,
    /// Watched event.
    pub event_id: Uuid,
    /// Condition expressed as a JSON object.
    pub condition: serde_json::Value,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlert {
    /// User to notify.
    pub user_id: Uuid,
    /// Watched event.
    pub event_id: Uuid,
    /// Condition object.
    pub condition: serde_json::Value,
}

/// Mutable alert fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertPatch {
    /// New watched event.
    pub event_id: Option<Uuid>,
    /// New condition.
    pub condition: Option<serde_json::Value>,
}

impl AlertPatch {
    /// Applies the patch to an in-memory alert.
    pub fn apply(&self, alert: &mut Alert) {
        if let Some(event_id) = self.event_id {
            alert.event_id = event_id;
        }
        if let Some(condition) = &self.condition {
            alert.condition = condition.clone();
        }
    }
}
