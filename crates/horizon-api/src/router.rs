//! Route definitions for the Event Horizon HTTP API.
//!
//! Routes are organized by domain and merged at the root. The router
//! receives `AppState` and passes it to all handlers via Axum's `State`
//! extractor.

use std::time::Duration;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .merge(info_routes())
        .merge(auth_routes())
        .merge(user_routes())
        .merge(event_routes())
        .merge(alert_routes())
        .merge(report_routes())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// API info and health
fn info_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::info::info))
        .route("/health", get(handlers::info::health))
}

/// Registration, login, token lifecycle and password change
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/password", put(handlers::auth::change_password))
}

/// User management
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
}

/// Events and their data points
fn event_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route(
            "/events/{id}",
            get(handlers::events::get_event)
                .put(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
        .route(
            "/events/{id}/data",
            get(handlers::events::list_event_data).post(handlers::events::create_event_data),
        )
        .route(
            "/events/{id}/data/{data_id}",
            put(handlers::events::update_event_data),
        )
}

/// Alerts
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/alerts",
            get(handlers::alerts::list_alerts).post(handlers::alerts::create_alert),
        )
        .route(
            "/alerts/{id}",
            get(handlers::alerts::get_alert)
                .patch(handlers::alerts::update_alert)
                .delete(handlers::alerts::delete_alert),
        )
}

/// Reports
fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reports",
            get(handlers::reports::list_reports).post(handlers::reports::create_report),
        )
        .route(
            "/reports/{id}",
            get(handlers::reports::get_report)
                .patch(handlers::reports::update_report)
                .delete(handlers::reports::delete_report),
        )
}
