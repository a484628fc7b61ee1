//! Provider error types

use thiserror::Error;

/// Errors that can occur while computing routes
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Connection to the routing service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to routing service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from routing service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// The service rejected the request (OSRM response code other than `Ok`)
    #[error("Routing service rejected request ({code}): {message}")]
    Rejected {
        /// OSRM response code, e.g. `InvalidQuery`
        code: String,
        /// Message sent along with the code
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl RoutingError {
    /// Returns true if the request never produced a usable answer
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}

/// Errors raised by the geocoding client
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// The service could not be reached
    #[error("Geocoder unreachable: {0}")]
    ConnectionFailed(String),

    /// The service answered with an unexpected HTTP status
    #[error("Geocoder returned an error: {0}")]
    RequestFailed(String),

    /// The response body was not the expected JSON
    #[error("Unreadable geocoder response: {0}")]
    ParseError(String),

    /// The service refused the query itself (HTTP 400)
    #[error("Geocoder rejected query: {0}")]
    QueryRejected(String),

    /// HTTP 429 from the service
    #[error("Geocoder rate limit hit")]
    RateLimitExceeded,

    /// Invalid client settings
    #[error("Geocoder misconfigured: {0}")]
    ConfigurationError(String),

    /// No answer within the configured timeout
    #[error("Geocoder timed out")]
    Timeout,
}

impl GeocodingError {
    /// Returns true if the request never produced a usable answer
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::RateLimitExceeded
                | Self::Timeout
        )
    }
}
