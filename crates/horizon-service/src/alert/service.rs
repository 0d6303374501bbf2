//! Alerts watching events.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use horizon_core::error::AppError;
use horizon_core::traits::Repository;
use horizon_core::types::pagination::{PageRequest, PageResponse};
use horizon_database::store::{AlertStore, EventStore};
use horizon_entity::alert::{Alert, AlertPatch, CreateAlert};

use crate::context::RequestContext;

/// Handles alert CRUD.
#[derive(Clone)]
pub struct AlertService {
    alerts: Arc<dyn AlertStore>,
    events: Arc<dyn EventStore>,
}

impl std::fmt::Debug for AlertService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertService").finish_non_exhaustive()
    }
}

impl AlertService {
    /// Creates a new alert service.
    pub fn new(alerts: Arc<dyn AlertStore>, events: Arc<dyn EventStore>) -> Self {
        Self { alerts, events }
    }

    /// Lists alerts, newest first.
    pub async fn list(&self, page: &PageRequest) -> Result<PageResponse<Alert>, AppError> {
        self.alerts.find_all(page).await
    }

    /// Alerts watching an event.
    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Alert>, AppError> {
        self.alerts.find_by_event(event_id).await
    }

    /// Fetches one alert.
    pub async fn get(&self, id: Uuid) -> Result<Alert, AppError> {
        self.alerts
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Creates an alert owned by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        event_id: Uuid,
        condition: serde_json::Value,
    ) -> Result<Alert, AppError> {
        check_condition(&condition)?;
        self.ensure_event(event_id).await?;

        let alert = self
            .alerts
            .create(&CreateAlert {
                user_id: ctx.user_id,
                event_id,
                condition,
            })
            .await?;
        info!(user_id = %ctx.user_id, alert_id = %alert.id, "Alert created");
        Ok(alert)
    }

    /// Updates an alert. The caller must own it or be an admin.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: &AlertPatch,
    ) -> Result<Alert, AppError> {
        let alert = self.get(id).await?;
        ctx.ensure_owner_or_admin(alert.user_id, "alert")?;
        if let Some(condition) = &patch.condition {
            check_condition(condition)?;
        }
        if let Some(event_id) = patch.event_id {
            self.ensure_event(event_id).await?;
        }

        self.alerts
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Deletes an alert. The caller must own it or be an admin.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let alert = self.get(id).await?;
        ctx.ensure_owner_or_admin(alert.user_id, "alert")?;
        if !self.alerts.delete(id).await? {
            return Err(not_found(id));
        }
        info!(user_id = %ctx.user_id, alert_id = %id, "Alert deleted");
        Ok(())
    }

    async fn ensure_event(&self, event_id: Uuid) -> Result<(), AppError> {
        match self.events.find_by_id(event_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::validation(format!("Event {event_id} does not exist"))),
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Alert {id} not found"))
}

fn check_condition(condition: &serde_json::Value) -> Result<(), AppError> {
    if condition.is_object() {
        Ok(())
    } else {
        Err(AppError::validation("condition must be a JSON object"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;

    use horizon_auth::Identity;
    use horizon_core::error::ErrorKind;
    use horizon_database::memory::{MemoryAlertStore, MemoryEventStore};
    use horizon_entity::event::CreateEvent;

    use super::*;

    fn ctx(user_id: Uuid) -> RequestContext {
        RequestContext::new(&Identity {
            user_id,
            jti: Uuid::new_v4(),
            is_admin: false,
            fresh: true,
            expires_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_alert_lifecycle() {
        let events = Arc::new(MemoryEventStore::new());
        let service = AlertService::new(Arc::new(MemoryAlertStore::new()), events.clone());
        let owner = ctx(Uuid::new_v4());
        let now = Utc::now();
        let event = events
            .create(&CreateEvent {
                name: "Launch".to_string(),
                description: String::new(),
                start_date: now,
                end_date: now + Duration::hours(1),
                author_id: owner.user_id,
            })
            .await
            .unwrap();

        let err = service
            .create(&owner, event.id, json!([1, 2]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = service
            .create(&owner, Uuid::new_v4(), json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let alert = service
            .create(&owner, event.id, json!({ "above": 100 }))
            .await
            .unwrap();
        assert_eq!(service.list_for_event(event.id).await.unwrap().len(), 1);

        let stranger = ctx(Uuid::new_v4());
        let err = service.delete(&stranger, alert.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        service.delete(&owner, alert.id).await.unwrap();
    }
}
