//! Convenience result type alias for Event Horizon.

use crate::error::AppError;

/// A specialized `Result` type for Event Horizon operations.
pub type AppResult<T> = Result<T, AppError>;
