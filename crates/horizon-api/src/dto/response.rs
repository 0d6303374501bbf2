//! Response DTOs.
//!
//! Every body is wrapped in [`ApiResponse`]: `{ data, links?, pagination? }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use horizon_core::types::pagination::PageResponse;
use horizon_entity::alert::Alert;
use horizon_entity::event::{Event, EventData};
use horizon_entity::report::Report;
use horizon_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
    /// Related resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    /// Page metadata for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a plain response.
    pub fn ok(data: T) -> Self {
        Self {
            data,
            links: None,
            pagination: None,
        }
    }

    /// Attaches hypermedia links. An empty list is omitted.
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        if !links.is_empty() {
            self.links = Some(links);
        }
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Builds a list response from a page, converting each item.
    ///
    /// `base_path` is used to render the `next`/`prev` links.
    pub fn paginated<E>(page: PageResponse<E>, base_path: &str, f: impl FnMut(E) -> T) -> Self {
        let meta = PaginationMeta::from_page(&page, base_path);
        Self {
            data: page.items.into_iter().map(f).collect(),
            links: None,
            pagination: Some(meta),
        }
    }
}

/// A hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation name.
    pub rel: String,
    /// Target path.
    pub href: String,
}

impl Link {
    /// Creates a link.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl PaginationMeta {
    fn from_page<E>(page: &PageResponse<E>, base_path: &str) -> Self {
        let href = |p: u64| format!("{base_path}?page={p}&perPage={}", page.per_page);
        Self {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            total_pages: page.total_pages,
            next: page.has_next().then(|| href(page.page + 1)),
            prev: page.has_previous().then(|| href(page.page - 1)),
        }
    }
}

/// User representation. The password digest is never included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub fname: Option<String>,
    pub lname: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<ReportResponse>>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            fname: u.fname,
            lname: u.lname,
            is_admin: u.is_admin,
            created_at: u.created_at,
            updated_at: u.updated_at,
            reports: None,
        }
    }
}

/// Register and login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            name: e.name,
            description: e.description,
            start_date: e.start_date,
            end_date: e.end_date,
            author_id: e.author_id,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDataResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventData> for EventDataResponse {
    fn from(d: EventData) -> Self {
        Self {
            id: d.id,
            event_id: d.event_id,
            data: d.data,
            timestamp: d.timestamp,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub condition: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Alert> for AlertResponse {
    fn from(a: Alert) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            event_id: a.event_id,
            condition: a.condition,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub filters: serde_json::Value,
    pub format: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponse {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            event_id: r.event_id,
            filters: r.filters,
            format: r.format,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// `GET /` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use horizon_core::types::pagination::PageRequest;

    use super::*;

    #[test]
    fn test_pagination_links() {
        let req = PageRequest::new(2, 10);
        let page = PageResponse::new(vec![1, 2, 3], &req, 35);
        let body = ApiResponse::paginated(page, "/events", |n| n * 2);

        let meta = body.pagination.unwrap();
        assert_eq!(body.data, vec![2, 4, 6]);
        assert_eq!(meta.total_pages, 4);
        assert_eq!(meta.next.as_deref(), Some("/events?page=3&perPage=10"));
        assert_eq!(meta.prev.as_deref(), Some("/events?page=1&perPage=10"));
    }

    #[test]
    fn test_empty_links_omitted() {
        let body = serde_json::to_value(ApiResponse::ok(1).with_links(vec![])).unwrap();
        assert!(body.get("links").is_none());
        assert!(body.get("pagination").is_none());
    }
}
