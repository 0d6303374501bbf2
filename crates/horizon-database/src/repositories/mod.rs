//! PostgreSQL implementations of the store traits.

pub mod alert;
pub mod event;
pub mod report;
pub mod revocation;
pub mod user;

pub use alert::AlertRepository;
pub use event::{EventDataRepository, EventRepository};
pub use report::ReportRepository;
pub use revocation::RevokedTokenRepository;
pub use user::UserRepository;

/// Returns true when the error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Returns true when the error is a foreign key violation.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
