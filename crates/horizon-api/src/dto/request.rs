//! Request DTOs.
//!
//! Field names are camelCase on the wire. Structural checks run through
//! `validator`; the password policy itself lives in the auth crate.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use horizon_auth::RegisterUser;
use horizon_entity::alert::AlertPatch;
use horizon_entity::event::{EventDataPatch, EventPatch};
use horizon_entity::report::ReportPatch;
use horizon_entity::user::UserPatch;
use horizon_service::{NewEvent, NewEventData};

/// Registration request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(max = 100))]
    pub fname: Option<String>,
    #[validate(length(max = 100))]
    pub lname: Option<String>,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            fname: req.fname,
            lname: req.lname,
        }
    }
}

/// Login request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Refresh request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub refresh_token: String,
}

/// Optional logout body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Password change request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub current_password: String,
    pub new_password: String,
}

/// Admin user creation request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(max = 100))]
    pub fname: Option<String>,
    #[validate(length(max = 100))]
    pub lname: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl CreateUserRequest {
    /// Splits into the provisioning input and the admin flag.
    pub fn into_parts(self) -> (RegisterUser, bool) {
        (
            RegisterUser {
                email: self.email,
                password: self.password,
                fname: self.fname,
                lname: self.lname,
            },
            self.is_admin,
        )
    }
}

/// Partial profile update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub fname: Option<String>,
    #[validate(length(max = 100))]
    pub lname: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            fname: req.fname,
            lname: req.lname,
            email: req.email,
        }
    }
}

/// Query flags for `GET /users/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(default)]
    pub with_reports: bool,
}

/// Event creation request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<CreateEventRequest> for NewEvent {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

/// Event update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(req: UpdateEventRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

/// Event data point request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDataRequest {
    pub data: serde_json::Value,
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<CreateEventDataRequest> for NewEventData {
    fn from(req: CreateEventDataRequest) -> Self {
        Self {
            data: req.data,
            timestamp: req.timestamp,
        }
    }
}

/// Event data point update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventDataRequest {
    pub data: Option<serde_json::Value>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<UpdateEventDataRequest> for EventDataPatch {
    fn from(req: UpdateEventDataRequest) -> Self {
        Self {
            data: req.data,
            timestamp: req.timestamp,
        }
    }
}

/// Alert creation request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub event_id: Uuid,
    pub condition: serde_json::Value,
}

/// Alert update request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlertRequest {
    pub event_id: Option<Uuid>,
    pub condition: Option<serde_json::Value>,
}

impl From<UpdateAlertRequest> for AlertPatch {
    fn from(req: UpdateAlertRequest) -> Self {
        Self {
            event_id: req.event_id,
            condition: req.condition,
        }
    }
}

/// Report creation request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub event_id: Uuid,
    #[serde(default = "empty_object")]
    pub filters: serde_json::Value,
    #[validate(length(min = 1, max = 10))]
    pub format: String,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Report update request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    pub filters: Option<serde_json::Value>,
    #[validate(length(min = 1, max = 10))]
    pub format: Option<String>,
}

impl From<UpdateReportRequest> for ReportPatch {
    fn from(req: UpdateReportRequest) -> Self {
        Self {
            filters: req.filters,
            format: req.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_bad_email() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "not-an-email",
            "password": "Password1234!"
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_event_name_length_bound() {
        let req: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "name": "x".repeat(101),
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-01-02T00:00:00Z"
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_report_format_bound_and_default_filters() {
        let req: CreateReportRequest = serde_json::from_value(serde_json::json!({
            "eventId": Uuid::new_v4(),
            "format": "csv"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.filters.is_object());

        let long = UpdateReportRequest {
            filters: None,
            format: Some("spreadsheet".to_string()),
        };
        assert!(long.validate().is_err());
    }
}
