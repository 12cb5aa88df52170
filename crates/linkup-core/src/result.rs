//! Convenience result type alias for Linkup.

use crate::error::AppError;

/// A specialized `Result` type for Linkup operations.
pub type AppResult<T> = Result<T, AppError>;
