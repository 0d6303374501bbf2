//! User handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::request::{CreateUserRequest, UpdateUserRequest, UserQuery};
use crate::dto::response::{ApiResponse, Link, UserResponse};
use crate::error::ApiError;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AdminUser, AuthUser, FreshUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AdminUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let page = state
        .user_service
        .list(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::paginated(page, "/users", UserResponse::from)))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AdminUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let (input, is_admin) = req.into_parts();
    let user = state.user_service.create(&auth, input, is_admin).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// GET /users/{id}
///
/// Links point at the events the user authored.
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let id = parse_uuid(&id)?;
    let detail = state.user_service.get(id, query.with_reports).await?;
    let events = state.event_service.list_by_author(id).await?;

    let mut body = UserResponse::from(detail.user);
    body.reports = detail
        .reports
        .map(|reports| reports.into_iter().map(Into::into).collect());

    let links = events
        .iter()
        .map(|e| Link::new("event", format!("/events/{}", e.id)))
        .collect();
    Ok(Json(ApiResponse::ok(body).with_links(links)))
}

/// PATCH /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: FreshUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let id = parse_uuid(&id)?;
    let user = state
        .user_service
        .update(&auth, id, &req.into())
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_uuid(&id)?;
    state.gate.require_fresh(&auth.identity)?;
    state.user_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
