//! Forward geocoding port
//!
//! Resolves free-text addresses to coordinate candidates. Adapters in the
//! infrastructure layer implement this port on top of a geocoding API.

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for forward geocoding
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve `address` into zero or more candidates, best first
    ///
    /// An empty list means the provider found nothing. Errors are reserved for
    /// failures: [`ApplicationError::ExternalService`] for transport problems
    /// (connection, timeout, rate limit) and [`ApplicationError::AddressNotFound`]
    /// when the provider rejected the query.
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn GeocodingPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeocodingPort>();
    }
}
