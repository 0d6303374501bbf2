//! Store traits consumed by the auth and service layers.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory one in [`crate::memory`]. Transaction and locking
//! discipline belongs to the implementation.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use horizon_core::result::AppResult;
use horizon_core::traits::Repository;
use horizon_entity::alert::{Alert, AlertPatch, CreateAlert};
use horizon_entity::event::{
    CreateEvent, CreateEventData, Event, EventData, EventDataPatch, EventPatch,
};
use horizon_entity::report::{CreateReport, Report, ReportPatch};
use horizon_entity::token::{NewRevocation, RevokedToken};
use horizon_entity::user::{CreateUser, User, UserPatch};

use crate::connection::DatabasePool;
use crate::memory::{
    MemoryAlertStore, MemoryEventStore, MemoryReportStore, MemoryRevocationStore, MemoryUserStore,
};
use crate::repositories::{
    AlertRepository, EventDataRepository, EventRepository, ReportRepository,
    RevokedTokenRepository, UserRepository,
};

/// User persistence. `create` and `update` fail with `Conflict` on a
/// duplicate email (compared case-insensitively).
#[async_trait]
pub trait UserStore: Repository<User, CreateUser, UserPatch> {
    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Replace the stored password digest. Returns `false` if the user is gone.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<bool>;

    /// Set or clear the administrative flag.
    async fn set_admin(&self, id: Uuid, is_admin: bool) -> AppResult<bool>;
}

/// Durable revocation records keyed by token id.
#[async_trait]
pub trait RevocationStore: Send + Sync + 'static {
    /// Look up the revocation record for a token id.
    async fn find(&self, jti: Uuid) -> AppResult<Option<RevokedToken>>;

    /// Insert a record. Returns `false` if the token id was already revoked.
    async fn insert(&self, record: &NewRevocation) -> AppResult<bool>;
}

/// Event persistence.
#[async_trait]
pub trait EventStore: Repository<Event, CreateEvent, EventPatch> {
    /// All events authored by a user, newest first.
    async fn find_by_author(&self, author_id: Uuid) -> AppResult<Vec<Event>>;
}

/// Event data persistence.
#[async_trait]
pub trait EventDataStore: Send + Sync + 'static {
    /// All data points of an event ordered by timestamp.
    async fn list_for_event(&self, event_id: Uuid) -> AppResult<Vec<EventData>>;

    /// Record a data point.
    async fn create_data(&self, data: &CreateEventData) -> AppResult<EventData>;

    /// Update a data point belonging to `event_id`.
    async fn update_data(
        &self,
        event_id: Uuid,
        id: Uuid,
        patch: &EventDataPatch,
    ) -> AppResult<Option<EventData>>;
}

/// Alert persistence.
#[async_trait]
pub trait AlertStore: Repository<Alert, CreateAlert, AlertPatch> {
    /// All alerts watching an event.
    async fn find_by_event(&self, event_id: Uuid) -> AppResult<Vec<Alert>>;
}

/// Report persistence.
#[async_trait]
pub trait ReportStore: Repository<Report, CreateReport, ReportPatch> {
    /// All reports owned by a user.
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Report>>;
}

/// One handle per store, shared across the application.
#[derive(Clone)]
pub struct StoreSet {
    /// Users.
    pub users: Arc<dyn UserStore>,
    /// Revoked tokens.
    pub revocations: Arc<dyn RevocationStore>,
    /// Events.
    pub events: Arc<dyn EventStore>,
    /// Event data points.
    pub event_data: Arc<dyn EventDataStore>,
    /// Alerts.
    pub alerts: Arc<dyn AlertStore>,
    /// Reports.
    pub reports: Arc<dyn ReportStore>,
}

impl StoreSet {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(database: &DatabasePool) -> Self {
        let pool = database.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            revocations: Arc::new(RevokedTokenRepository::new(pool.clone())),
            events: Arc::new(EventRepository::new(pool.clone())),
            event_data: Arc::new(EventDataRepository::new(pool.clone())),
            alerts: Arc::new(AlertRepository::new(pool.clone())),
            reports: Arc::new(ReportRepository::new(pool)),
        }
    }

    /// Process-local stores.
    pub fn in_memory() -> Self {
        let events = Arc::new(MemoryEventStore::new());
        Self {
            users: Arc::new(MemoryUserStore::new()),
            revocations: Arc::new(MemoryRevocationStore::new()),
            events: events.clone(),
            event_data: events,
            alerts: Arc::new(MemoryAlertStore::new()),
            reports: Arc::new(MemoryReportStore::new()),
        }
    }
}

impl std::fmt::Debug for StoreSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSet").finish_non_exhaustive()
    }
}
