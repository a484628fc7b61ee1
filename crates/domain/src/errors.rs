//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Latitude or longitude out of range
    #[error("Invalid coordinates: ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// The platform reported an authorization code the core does not know
    #[error("Unknown authorization state code: {0}")]
    UnknownAuthorizationState(i32),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}
