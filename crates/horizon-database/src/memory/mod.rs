//! In-memory store implementations using Tokio locks.
//!
//! Suitable for single-node deployments without PostgreSQL and for tests.
//! Rows are kept in insertion order; listings return newest first.

pub mod alert;
pub mod event;
pub mod report;
pub mod revocation;
pub mod user;

pub use alert::MemoryAlertStore;
pub use event::MemoryEventStore;
pub use report::MemoryReportStore;
pub use revocation::MemoryRevocationStore;
pub use user::MemoryUserStore;

use horizon_core::types::pagination::{PageRequest, PageResponse};

/// Slice one page out of rows held oldest first.
pub(crate) fn newest_first_page<T: Clone>(rows: &[T], page: &PageRequest) -> PageResponse<T> {
    let items = rows
        .iter()
        .rev()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .cloned()
        .collect();
    PageResponse::new(items, page, rows.len() as u64)
}
