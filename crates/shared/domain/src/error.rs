//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;
use validator::ValidationErrors;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness rule violated
    #[error("{0} already exists")]
    Conflict(String),

    /// Name and password did not match a single user
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(entity: impl Into<String>) -> Self {
        DomainError::Conflict(entity.into())
    }
}

/// Collapse `validator` output into a single message.
///
/// Only the first failing field is reported.
impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .next()
            .and_then(|errors| errors.first())
            .and_then(|error| error.message.as_ref())
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| "Validation failed".to_string());
        DomainError::Validation(message)
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
