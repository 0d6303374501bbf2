//! Report handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::request::{CreateReportRequest, UpdateReportRequest};
use crate::dto::response::{ApiResponse, Link, ReportResponse};
use crate::error::ApiError;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /reports
pub async fn list_reports(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<ReportResponse>>>, ApiError> {
    let page = state
        .report_service
        .list(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::paginated(page, "/reports", ReportResponse::from)))
}

/// POST /reports
pub async fn create_report(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponse>>), ApiError> {
    let report = state
        .report_service
        .create(&auth, req.event_id, req.filters, req.format)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(report.into()))))
}

/// GET /reports/{id}
///
/// Links point at the reported event.
pub async fn get_report(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReportResponse>>, ApiError> {
    let report = state.report_service.get(parse_uuid(&id)?).await?;
    let link = Link::new("event", format!("/events/{}", report.event_id));
    Ok(Json(
        ApiResponse::ok(ReportResponse::from(report)).with_links(vec![link]),
    ))
}

/// PATCH /reports/{id}
pub async fn update_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateReportRequest>,
) -> Result<Json<ApiResponse<ReportResponse>>, ApiError> {
    let id = parse_uuid(&id)?;
    let report = state.report_service.update(&auth, id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(report.into())))
}

/// DELETE /reports/{id}
pub async fn delete_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.report_service.delete(&auth, parse_uuid(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
