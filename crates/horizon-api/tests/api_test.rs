//! End-to-end tests driving the router over in-memory stores.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use horizon_api::{AppState, build_app};
use horizon_auth::RegisterUser;
use horizon_core::config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig};
use horizon_database::StoreSet;

const PASSWORD: &str = "Password1234!";

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig::default(),
        auth: AuthConfig {
            jwt_secret: "integration-test-secret-0123456789".to_string(),
            hash_memory_kib: 1024,
            hash_iterations: 1,
            ..AuthConfig::default()
        },
        logging: LoggingConfig::default(),
    }
}

fn test_app() -> (Router, AppState) {
    let state = AppState::new(test_config(), StoreSet::in_memory(), None).unwrap();
    (build_app(state.clone()), state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, email: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": PASSWORD, "fname": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn token(body: &Value, field: &str) -> String {
    body["data"][field].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_info_and_health() {
    let (app, _) = test_app();

    let (status, body) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Event Horizon API");

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "in-memory");
}

#[tokio::test]
async fn test_register_change_password_logout_revokes_token() {
    let (app, _) = test_app();
    let body = register(&app, "ada@example.com").await;
    assert!(body["data"]["user"].get("passwordHash").is_none());
    let access = token(&body, "accessToken");

    let (status, _) = send(
        &app,
        "PUT",
        "/auth/password",
        Some(&access),
        Some(json!({ "currentPassword": PASSWORD, "newPassword": "Different5678#" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "POST", "/auth/logout", Some(&access), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", "/auth/me", Some(&access), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, body) = send(
        &app,
        "PUT",
        "/auth/password",
        Some(&access),
        Some(json!({ "currentPassword": "Different5678#", "newPassword": "Another9012$" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "Different5678#" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_huge_page_returns_empty_list() {
    let (app, _) = test_app();
    let body = register(&app, "hopper@example.com").await;
    let access = token(&body, "accessToken");

    let (status, body) = send(
        &app,
        "GET",
        "/events?page=18446744073709551615&perPage=100",
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["page"], json!(u64::MAX));
    assert!(body["pagination"].get("next").is_none_or(Value::is_null));
}

#[tokio::test]
async fn test_refreshed_token_is_stale() {
    let (app, _) = test_app();
    register(&app, "grace@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "grace@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let refresh = token(&body, "refreshToken");

    let (status, body) = send(
        &app,
        "POST",
        "/auth/refresh",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stale = token(&body, "accessToken");

    let (status, _) = send(&app, "GET", "/auth/me", Some(&stale), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "PUT",
        "/auth/password",
        Some(&stale),
        Some(json!({ "currentPassword": PASSWORD, "newPassword": "Different5678#" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Fresh token required");
}

#[tokio::test]
async fn test_login_sets_http_only_cookie_usable_for_auth() {
    let (app, _) = test_app();
    register(&app, "cookie@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "cookie@example.com", "password": PASSWORD }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("access_token="));
    assert!(set_cookie.contains("HttpOnly"));
    let pair = set_cookie.split(';').next().unwrap().to_string();

    let request = Request::builder()
        .uri("/auth/me")
        .header(header::COOKIE, pair)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bad_login_is_generic() {
    let (app, _) = test_app();
    register(&app, "known@example.com").await;

    let (status_a, body_a) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "known@example.com", "password": "Wrong1234!" })),
    )
    .await;
    let (status_b, body_b) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_b, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a["message"], body_b["message"]);
}

#[tokio::test]
async fn test_weak_password_reports_rule() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "weak@example.com", "password": "NoSymbolsABC123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["rule"], "password_symbol");

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["fields"]["email"].is_array());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let (app, _) = test_app();
    register(&app, "dup@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "dup@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_user_listing_requires_admin() {
    let (app, state) = test_app();
    let body = register(&app, "member@example.com").await;
    let member = token(&body, "accessToken");

    let (status, _) = send(&app, "GET", "/users", Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    state
        .session_manager
        .provision(
            RegisterUser {
                email: "root@example.com".to_string(),
                password: PASSWORD.to_string(),
                fname: None,
                lname: None,
            },
            true,
        )
        .await
        .unwrap();
    let (_, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "root@example.com", "password": PASSWORD })),
    )
    .await;
    let admin = token(&body, "accessToken");

    let (status, body) = send(&app, "GET", "/users?page=1&perPage=1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["pagination"]["next"], "/users?page=2&perPage=1");
}

#[tokio::test]
async fn test_event_lifecycle_with_links_and_data() {
    let (app, _) = test_app();
    let body = register(&app, "author@example.com").await;
    let access = token(&body, "accessToken");
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/events",
        Some(&access),
        Some(json!({
            "name": "Launch",
            "description": "Rocket launch",
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-01-02T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/events/{event_id}/data"),
        Some(&access),
        Some(json!({ "data": { "altitude": 1200 } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/alerts",
        Some(&access),
        Some(json!({ "eventId": event_id, "condition": { "altitude": { "gt": 1000 } } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let alert_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, "GET", &format!("/events/{event_id}"), Some(&access), None).await;
    assert_eq!(body["links"][0]["href"], format!("/alerts/{alert_id}"));

    let (_, body) = send(&app, "GET", &format!("/users/{user_id}"), Some(&access), None).await;
    assert_eq!(body["links"][0]["href"], format!("/events/{event_id}"));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/events/{event_id}/data"),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["data"]["altitude"], 1200);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/events/{event_id}"),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/events/{event_id}/data"),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reports_embed_on_user_fetch() {
    let (app, _) = test_app();
    let body = register(&app, "analyst@example.com").await;
    let access = token(&body, "accessToken");
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        "POST",
        "/events",
        Some(&access),
        Some(json!({
            "name": "Quarterly",
            "startDate": "2026-03-01T00:00:00Z",
            "endDate": "2026-03-31T00:00:00Z"
        })),
    )
    .await;
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/reports",
        Some(&access),
        Some(json!({ "eventId": event_id, "format": "csv" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["links"], Value::Null);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/users/{user_id}?withReports=true"),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(body["data"]["reports"][0]["format"], "csv");

    let (_, body) = send(&app, "GET", &format!("/users/{user_id}"), Some(&access), None).await;
    assert!(body["data"].get("reports").is_none());
}

#[tokio::test]
async fn test_missing_token_and_bad_id() {
    let (app, _) = test_app();
    let (status, _) = send(&app, "GET", "/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = register(&app, "ids@example.com").await;
    let access = token(&body, "accessToken");
    let (status, _) = send(&app, "GET", "/events/not-a-uuid", Some(&access), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
