//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `PriceDbError`, so functions can simply return `Result<T>`.
use crate::error::PriceDbError;

/// Workspace-wide `Result` alias with `PriceDbError` as the default error.
pub type Result<T, E = PriceDbError> = std::result::Result<T, E>;
