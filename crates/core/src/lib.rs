//! Shared primitives for all Rust crates in Tilgang.

#![forbid(unsafe_code)]

/// Deployment path prefix shared by every backend call.
pub mod base_path;

use thiserror::Error;

pub use base_path::BasePath;

/// Result type used across Tilgang crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation conflicts with current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated against the backend.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but the backend refused the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Backend answered with a body that does not match the expected schema.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Network failure, timeout or exhausted retries against a failing backend.
    #[error("transport error: {0}")]
    Transport(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
