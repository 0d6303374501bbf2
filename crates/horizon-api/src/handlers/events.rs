//! Event and event data handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::request::{
    CreateEventDataRequest, CreateEventRequest, UpdateEventDataRequest, UpdateEventRequest,
};
use crate::dto::response::{ApiResponse, EventDataResponse, EventResponse, Link};
use crate::error::ApiError;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, FreshUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /events
pub async fn list_events(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<EventResponse>>>, ApiError> {
    let page = state
        .event_service
        .list(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::paginated(page, "/events", EventResponse::from)))
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EventResponse>>), ApiError> {
    let event = state.event_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(event.into()))))
}

/// GET /events/{id}
///
/// Links point at the alerts watching the event.
pub async fn get_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventResponse>>, ApiError> {
    let id = parse_uuid(&id)?;
    let event = state.event_service.get(id).await?;
    let alerts = state.alert_service.list_for_event(id).await?;

    let links = alerts
        .iter()
        .map(|a| Link::new("alert", format!("/alerts/{}", a.id)))
        .collect();
    Ok(Json(ApiResponse::ok(EventResponse::from(event)).with_links(links)))
}

/// PUT /events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateEventRequest>,
) -> Result<Json<ApiResponse<EventResponse>>, ApiError> {
    let id = parse_uuid(&id)?;
    let event = state.event_service.update(&auth, id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(event.into())))
}

/// DELETE /events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    auth: FreshUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_uuid(&id)?;
    state.event_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /events/{id}/data
pub async fn list_event_data(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<EventDataResponse>>>, ApiError> {
    let id = parse_uuid(&id)?;
    let rows = state.event_service.list_data(id).await?;
    Ok(Json(ApiResponse::ok(
        rows.into_iter().map(EventDataResponse::from).collect(),
    )))
}

/// POST /events/{id}/data
pub async fn create_event_data(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateEventDataRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EventDataResponse>>), ApiError> {
    let id = parse_uuid(&id)?;
    let row = state.event_service.add_data(&auth, id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(row.into()))))
}

/// PUT /events/{id}/data/{data_id}
pub async fn update_event_data(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, data_id)): Path<(String, String)>,
    ValidatedJson(req): ValidatedJson<UpdateEventDataRequest>,
) -> Result<Json<ApiResponse<EventDataResponse>>, ApiError> {
    let id = parse_uuid(&id)?;
    let data_id = parse_uuid(&data_id)?;
    let row = state
        .event_service
        .update_data(&auth, id, data_id, &req.into())
        .await?;
    Ok(Json(ApiResponse::ok(row.into())))
}
