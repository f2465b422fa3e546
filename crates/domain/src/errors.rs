//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A field failed validation
    #[error("Validation failed for {field}: {message}")]
    ValidationFailed {
        /// Offending field
        field: String,
        /// User-facing message
        message: String,
    },

    /// Coordinates out of range
    #[error(transparent)]
    InvalidCoordinates(#[from] crate::value_objects::InvalidCoordinates),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Kind of entity
        entity_type: String,
        /// Requested id
        id: String,
    },

    /// Workflow transition not allowed from the current step
    #[error(transparent)]
    Workflow(#[from] crate::entities::WorkflowError),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create a field validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
}
