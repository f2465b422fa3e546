//! Application-level errors

use domain::{DomainError, WorkflowError};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// An address could not be resolved by any provider
    #[error("Could not find location: {0}")]
    Geocode(String),

    /// No route between the resolved coordinates
    #[error("Could not calculate route: {0}")]
    Route(String),

    /// Input rejected before any external call
    #[error("Validation failed for {field}: {message}")]
    Validation {
        /// Offending field
        field: String,
        /// User-facing message
        message: String,
    },

    /// Booking store failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// The operation was cancelled before completion
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not allowed in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<WorkflowError> for ApplicationError {
    fn from(err: WorkflowError) -> Self {
        Self::Domain(DomainError::from(err))
    }
}

impl ApplicationError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if the user can simply try again
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Geocode(_) | Self::Route(_) | Self::ExternalService(_)
        )
    }

    /// Field that failed validation, if this is a validation error
    pub fn invalid_field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. }
            | Self::Domain(DomainError::ValidationFailed { field, .. }) => Some(field),
            _ => None,
        }
    }
}
