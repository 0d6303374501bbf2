//! Alert handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::request::{CreateAlertRequest, UpdateAlertRequest};
use crate::dto::response::{AlertResponse, ApiResponse, Link};
use crate::error::ApiError;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /alerts
pub async fn list_alerts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<AlertResponse>>>, ApiError> {
    let page = state
        .alert_service
        .list(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::paginated(page, "/alerts", AlertResponse::from)))
}

/// POST /alerts
pub async fn create_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateAlertRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AlertResponse>>), ApiError> {
    let alert = state
        .alert_service
        .create(&auth, req.event_id, req.condition)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(alert.into()))))
}

/// GET /alerts/{id}
pub async fn get_alert(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AlertResponse>>, ApiError> {
    let alert = state.alert_service.get(parse_uuid(&id)?).await?;
    let link = Link::new("event", format!("/events/{}", alert.event_id));
    Ok(Json(
        ApiResponse::ok(AlertResponse::from(alert)).with_links(vec![link]),
    ))
}

/// PATCH /alerts/{id}
pub async fn update_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateAlertRequest>,
) -> Result<Json<ApiResponse<AlertResponse>>, ApiError> {
    let id = parse_uuid(&id)?;
    let alert = state.alert_service.update(&auth, id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(alert.into())))
}

/// DELETE /alerts/{id}
pub async fn delete_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.alert_service.delete(&auth, parse_uuid(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
