//! Application-level errors

use std::fmt;

use domain::DomainError;
use thiserror::Error;

/// Underlying reason a route could not be produced
///
/// Callers only ever see [`ApplicationError::RouteUnavailable`]; the cause is
/// kept for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFailureCause {
    /// The provider answered but returned no usable route
    NoRoute,
    /// The request never produced a usable answer (network, HTTP, parse)
    Transport,
}

impl fmt::Display for RouteFailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRoute => f.write_str("no_route"),
            Self::Transport => f.write_str("transport"),
        }
    }
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Location access was denied or restricted; the user must act outside the app
    #[error("Location access denied")]
    PermissionDenied,

    /// Positioning failed or no fix has been obtained yet
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// Geocoding returned no candidate for the address
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// No usable route (no road exists or the request failed)
    #[error("Route unavailable: {reason}")]
    RouteUnavailable {
        /// Diagnostic cause, not shown to users
        cause: RouteFailureCause,
        /// Human-readable reason
        reason: String,
    },

    /// The user submitted a blank address
    #[error("Address must not be empty")]
    EmptyInput,

    /// A request of the same kind is already outstanding
    #[error("A {0} request is already in flight")]
    RequestInFlight(&'static str),

    /// The operation was called in a state that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,

    /// External service error (transport level)
    #[error("External service error: {0}")]
    ExternalService(String),
}

impl ApplicationError {
    /// Route failure with an explicit cause
    pub fn route_unavailable(cause: RouteFailureCause, reason: impl Into<String>) -> Self {
        Self::RouteUnavailable {
            cause,
            reason: reason.into(),
        }
    }

    /// Whether the user has to change their input to make progress
    pub const fn requires_new_input(&self) -> bool {
        matches!(
            self,
            Self::AddressNotFound(_) | Self::EmptyInput | Self::RouteUnavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_unavailable_hides_cause_in_message() {
        let no_route = ApplicationError::route_unavailable(RouteFailureCause::NoRoute, "no road");
        let transport =
            ApplicationError::route_unavailable(RouteFailureCause::Transport, "no road");
        assert_eq!(no_route.to_string(), transport.to_string());
    }

    #[test]
    fn requires_new_input() {
        assert!(ApplicationError::EmptyInput.requires_new_input());
        assert!(ApplicationError::AddressNotFound("x".into()).requires_new_input());
        assert!(!ApplicationError::PermissionDenied.requires_new_input());
        assert!(!ApplicationError::LocationUnavailable("x".into()).requires_new_input());
    }

    #[test]
    fn domain_errors_convert() {
        let err: ApplicationError = DomainError::ValidationError("bad".into()).into();
        assert!(matches!(err, ApplicationError::Domain(_)));
        assert_eq!(err.to_string(), "Validation failed: bad");
    }

    #[test]
    fn in_flight_message_names_the_request() {
        let err = ApplicationError::RequestInFlight("geocoding");
        assert_eq!(err.to_string(), "A geocoding request is already in flight");
    }
}
