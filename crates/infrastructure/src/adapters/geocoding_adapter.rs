//! Geocoding adapter - Implements GeocodingPort using integration_routing

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::Coordinate;
use integration_routing::{GeocodingError, GeocodingProvider, NominatimGeocodingClient};
use tracing::{debug, instrument, warn};

/// Adapter for forward geocoding via Nominatim
pub struct GeocodingAdapter {
    provider: Arc<dyn GeocodingProvider>,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter").finish_non_exhaustive()
    }
}

impl GeocodingAdapter {
    pub fn new(provider: Arc<dyn GeocodingProvider>) -> Self {
        Self { provider }
    }

    /// Adapter backed by a Nominatim client
    pub fn nominatim(client: NominatimGeocodingClient) -> Self {
        Self::new(Arc::new(client))
    }

    /// Transport failures stay `ExternalService`; anything else means the
    /// provider could not answer the query
    fn map_error(address: &str, e: &GeocodingError) -> ApplicationError {
        if e.is_transport() {
            ApplicationError::ExternalService(format!("Geocoding failed: {e}"))
        } else {
            ApplicationError::AddressNotFound(address.to_string())
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, ApplicationError> {
        let candidates = self.provider.geocode(address).await.map_err(|e| {
            warn!(error = %e, "Geocoding provider error");
            Self::map_error(address, &e)
        })?;

        let coordinates: Vec<Coordinate> = candidates
            .iter()
            .filter_map(|c| match Coordinate::new(c.latitude, c.longitude) {
                Ok(coordinate) => Some(coordinate),
                Err(e) => {
                    warn!(error = %e, "Skipping invalid geocoding candidate");
                    None
                },
            })
            .collect();

        debug!(count = coordinates.len(), "Geocoding candidates converted");
        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use integration_routing::{GeoCandidate, NominatimConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    enum FixedProvider {
        Candidates(Vec<GeoCandidate>),
        TimedOut,
        Rejected,
    }

    #[async_trait]
    impl GeocodingProvider for FixedProvider {
        async fn geocode(&self, address: &str) -> Result<Vec<GeoCandidate>, GeocodingError> {
            match self {
                Self::Candidates(candidates) => Ok(candidates.clone()),
                Self::TimedOut => Err(GeocodingError::Timeout),
                Self::Rejected => Err(GeocodingError::QueryRejected(address.to_string())),
            }
        }
    }

    fn candidate(latitude: f64, longitude: f64) -> GeoCandidate {
        GeoCandidate {
            latitude,
            longitude,
            display_name: None,
        }
    }

    #[tokio::test]
    async fn converts_candidates_in_order() {
        let adapter = GeocodingAdapter::new(Arc::new(FixedProvider::Candidates(vec![
            candidate(48.86, 2.35),
            candidate(33.66, -95.55),
        ])));

        let coordinates = adapter.geocode("Paris").await.unwrap();
        assert_eq!(coordinates.len(), 2);
        assert!((coordinates[0].latitude() - 48.86).abs() < 1e-9);
    }

    #[tokio::test]
    async fn skips_out_of_range_candidates() {
        let adapter = GeocodingAdapter::new(Arc::new(FixedProvider::Candidates(vec![
            candidate(95.0, 0.0),
            candidate(52.52, 13.40),
        ])));

        let coordinates = adapter.geocode("Berlin").await.unwrap();
        assert_eq!(coordinates.len(), 1);
    }

    #[tokio::test]
    async fn transport_error_is_external_service() {
        let adapter = GeocodingAdapter::new(Arc::new(FixedProvider::TimedOut));

        let err = adapter.geocode("Paris").await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }

    #[tokio::test]
    async fn rejected_query_is_address_not_found() {
        let adapter = GeocodingAdapter::new(Arc::new(FixedProvider::Rejected));

        let err = adapter.geocode("%%%").await.unwrap_err();
        assert!(matches!(err, ApplicationError::AddressNotFound(a) if a == "%%%"));
    }

    #[tokio::test]
    async fn nominatim_adapter_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"[{"lat": "43.769562", "lon": "11.255814"}]"#),
            )
            .mount(&server)
            .await;

        let config = NominatimConfig {
            base_url: server.uri(),
            ..NominatimConfig::for_testing()
        };
        let adapter = GeocodingAdapter::nominatim(NominatimGeocodingClient::new(&config).unwrap());

        let coordinates = adapter.geocode("Florence").await.unwrap();
        assert_eq!(coordinates.len(), 1);
        assert!((coordinates[0].longitude() - 11.255_814).abs() < 1e-9);
    }
}
