//! Convenience result type alias for SlotBot.

use crate::error::AppError;

/// A specialized `Result` type for SlotBot operations.
pub type AppResult<T> = Result<T, AppError>;
