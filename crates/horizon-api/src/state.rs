//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use horizon_auth::{AuthGate, JwtDecoder, RevocationLedger, SessionManager};
use horizon_core::config::AppConfig;
use horizon_core::error::AppError;
use horizon_database::{DatabasePool, StoreSet};
use horizon_service::{AlertService, EventService, ReportService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent when running on in-memory stores
    pub database: Option<DatabasePool>,
    /// Persistence behind the services
    pub stores: StoreSet,

    // ── Auth ─────────────────────────────────────────────────
    /// Per-request token verification
    pub gate: Arc<AuthGate>,
    /// Credential flows
    pub session_manager: Arc<SessionManager>,

    // ── Services ─────────────────────────────────────────────
    /// User service
    pub user_service: Arc<UserService>,
    /// Event service
    pub event_service: Arc<EventService>,
    /// Alert service
    pub alert_service: Arc<AlertService>,
    /// Report service
    pub report_service: Arc<ReportService>,
}

impl AppState {
    /// Wires the auth subsystem and services over the given stores.
    pub fn new(
        config: AppConfig,
        stores: StoreSet,
        database: Option<DatabasePool>,
    ) -> Result<Self, AppError> {
        config.auth.validate()?;

        let ledger = RevocationLedger::new(Arc::clone(&stores.revocations));
        let gate = Arc::new(AuthGate::new(JwtDecoder::new(&config.auth), ledger.clone()));
        let session_manager = Arc::new(SessionManager::new(
            &config.auth,
            Arc::clone(&stores.users),
            Arc::clone(&gate),
            ledger,
        )?);

        let user_service = Arc::new(UserService::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.reports),
            Arc::clone(&session_manager),
        ));
        let event_service = Arc::new(EventService::new(
            Arc::clone(&stores.events),
            Arc::clone(&stores.event_data),
        ));
        let alert_service = Arc::new(AlertService::new(
            Arc::clone(&stores.alerts),
            Arc::clone(&stores.events),
        ));
        let report_service = Arc::new(ReportService::new(
            Arc::clone(&stores.reports),
            Arc::clone(&stores.events),
        ));

        Ok(Self {
            config: Arc::new(config),
            database,
            stores,
            gate,
            session_manager,
            user_service,
            event_service,
            alert_service,
            report_service,
        })
    }
}
