//! Geocoding client
//!
//! Resolves a free-text address into a single coordinate by taking the first
//! candidate the provider returns.

use std::sync::Arc;

use domain::Coordinate;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::in_flight::InFlight;
use crate::ports::GeocodingPort;

/// Address-to-coordinate resolution with one outstanding request at a time
pub struct GeocodingClient {
    port: Arc<dyn GeocodingPort>,
    in_flight: InFlight,
}

impl std::fmt::Debug for GeocodingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingClient")
            .field("in_flight", &self.in_flight.is_busy())
            .finish_non_exhaustive()
    }
}

impl GeocodingClient {
    pub fn new(port: Arc<dyn GeocodingPort>) -> Self {
        Self {
            port,
            in_flight: InFlight::new("geocoding"),
        }
    }

    /// Resolve `address` to the first candidate coordinate
    ///
    /// Blank input fails with [`ApplicationError::AddressNotFound`] without
    /// contacting the provider. Transport failures propagate as
    /// [`ApplicationError::ExternalService`].
    #[instrument(skip(self))]
    pub async fn resolve(&self, address: &str) -> Result<Coordinate, ApplicationError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(ApplicationError::AddressNotFound(address.to_string()));
        }

        let _guard = self.in_flight.begin()?;

        let candidates = match self.port.geocode(query).await {
            Ok(candidates) => candidates,
            Err(ApplicationError::ExternalService(reason)) => {
                warn!(%reason, "Geocoding transport failure");
                return Err(ApplicationError::ExternalService(reason));
            },
            Err(e) => {
                debug!(error = %e, "Geocoding rejected by provider");
                return Err(ApplicationError::AddressNotFound(query.to_string()));
            },
        };

        debug!(count = candidates.len(), "Geocoding candidates received");
        candidates
            .into_iter()
            .next()
            .ok_or_else(|| ApplicationError::AddressNotFound(query.to_string()))
    }
}
