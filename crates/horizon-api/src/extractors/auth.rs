//! Extractors for the authenticated caller.
//!
//! The access token is read from `Authorization: Bearer <token>` or, when
//! that header is absent, from the configured cookie.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use horizon_auth::Identity;
use horizon_core::error::AppError;
use horizon_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Verified token identity.
    pub identity: Identity,
    /// Service-level request context.
    pub context: RequestContext,
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// Pulls the raw access token from the request.
fn bearer_token(parts: &Parts, cookie_name: &str) -> Result<String, AppError> {
    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        let value = header
            .to_str()
            .map_err(|_| AppError::unauthorized("Invalid Authorization header"))?;
        return value
            .strip_prefix("Bearer ")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"));
    }

    CookieJar::from_headers(&parts.headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::unauthorized("Missing access token"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, &state.config.auth.cookie_name)?;
        let identity = state.gate.authenticate(&token).await?;
        let context = RequestContext::new(&identity);
        Ok(AuthUser { identity, context })
    }
}

/// An authenticated caller whose token came from a primary login.
#[derive(Debug, Clone)]
pub struct FreshUser(pub AuthUser);

impl std::ops::Deref for FreshUser {
    type Target = AuthUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for FreshUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        state.gate.require_fresh(&user.identity)?;
        Ok(FreshUser(user))
    }
}

/// An authenticated caller carrying the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl std::ops::Deref for AdminUser {
    type Target = AuthUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        state.gate.require_admin(&user.identity)?;
        Ok(AdminUser(user))
    }
}
