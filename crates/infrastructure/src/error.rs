//! Infrastructure error types

use thiserror::Error;

use crate::telemetry::TelemetryError;

/// Errors raised while assembling the application from configuration
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Configuration could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration was read but holds invalid values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An external service client could not be created
    #[error("Client initialization failed: {0}")]
    Client(String),

    /// Logging could not be initialized
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

impl From<integration_routing::GeocodingError> for InfrastructureError {
    fn from(e: integration_routing::GeocodingError) -> Self {
        Self::Client(e.to_string())
    }
}

impl From<integration_routing::RoutingError> for InfrastructureError {
    fn from(e: integration_routing::RoutingError) -> Self {
        Self::Client(e.to_string())
    }
}
