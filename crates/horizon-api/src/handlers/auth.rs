//! Auth handlers: register, login, refresh, logout, me, password change.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use horizon_auth::AuthResult;
use horizon_core::error::AppError;

use crate::dto::request::{
    ChangePasswordRequest, LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest,
};
use crate::dto::response::{ApiResponse, AuthResponse, RefreshResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, FreshUser, ValidatedJson};
use crate::state::AppState;

fn auth_response(result: AuthResult) -> AuthResponse {
    AuthResponse {
        user: result.user.into(),
        access_token: result.tokens.access.token,
        refresh_token: result.tokens.refresh.token,
    }
}

fn access_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.config.auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(state.config.auth.cookie_secure)
        .same_site(SameSite::Lax)
        .build()
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let result = state.session_manager.register(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(auth_response(result))),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<AuthResponse>>), ApiError> {
    let result = state
        .session_manager
        .login(&req.email, &req.password)
        .await?;

    let jar = jar.add(access_cookie(&state, result.tokens.access.token.clone()));
    Ok((jar, Json(ApiResponse::ok(auth_response(result)))))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let issued = state.session_manager.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(RefreshResponse {
        access_token: issued.token,
    })))
}

/// POST /auth/logout
///
/// The body is optional; when it carries a refresh token that token is
/// revoked along with the access token.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    body: Bytes,
) -> Result<(StatusCode, CookieJar), ApiError> {
    let req: LogoutRequest = if body.iter().all(u8::is_ascii_whitespace) {
        LogoutRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid logout body: {e}")))?
    };

    state
        .session_manager
        .logout(&auth.identity, req.refresh_token.as_deref())
        .await?;

    let removal = Cookie::build((state.config.auth.cookie_name.clone(), "")).path("/");
    let jar = jar.remove(removal);
    Ok((StatusCode::NO_CONTENT, jar))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: FreshUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .session_manager
        .change_password(&auth.identity, &req.current_password, &req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
