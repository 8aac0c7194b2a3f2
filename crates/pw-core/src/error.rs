//! # AppError
//!
//! Centralized error handling for the Poster-Wall ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all pw-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Poster referenced by an unknown ID)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., missing title, disallowed file type)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Infrastructure failure (e.g., DB down, disk full)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// A specialized Result type for Poster-Wall logic.
pub type Result<T> = std::result::Result<T, AppError>;
