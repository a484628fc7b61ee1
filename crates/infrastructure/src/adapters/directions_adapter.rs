//! Directions adapter - Implements DirectionsPort using integration_routing

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::DirectionsPort;
use async_trait::async_trait;
use domain::{Coordinate, Route, RouteRequest};
use integration_routing::{DrivingRoute, OsrmRoutingClient, RoutingProvider};
use tracing::{debug, instrument, warn};

/// Adapter for driving directions via OSRM
pub struct DirectionsAdapter {
    provider: Arc<dyn RoutingProvider>,
}

impl std::fmt::Debug for DirectionsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionsAdapter").finish_non_exhaustive()
    }
}

impl DirectionsAdapter {
    pub fn new(provider: Arc<dyn RoutingProvider>) -> Self {
        Self { provider }
    }

    /// Adapter backed by an OSRM client
    pub fn osrm(client: OsrmRoutingClient) -> Self {
        Self::new(Arc::new(client))
    }

    /// Convert an integration route to a domain route
    fn convert_route(route: &DrivingRoute) -> Result<Route, ApplicationError> {
        let geometry = route
            .geometry
            .iter()
            .map(|&(lat, lon)| Coordinate::new(lat, lon))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Route::new(geometry, route.distance_meters)?.with_travel_time(route.duration_secs))
    }
}

#[async_trait]
impl DirectionsPort for DirectionsAdapter {
    #[instrument(skip(self), fields(origin = %request.origin, destination = %request.destination))]
    async fn calculate(&self, request: &RouteRequest) -> Result<Vec<Route>, ApplicationError> {
        let response = self
            .provider
            .driving_routes(
                request.origin,
                request.destination,
                request.requests_alternates,
            )
            .await
            .map_err(|e| {
                warn!(error = %e, transport = e.is_transport(), "Routing provider error");
                ApplicationError::ExternalService(format!("Route request failed: {e}"))
            })?;

        let routes: Vec<Route> = response
            .routes
            .iter()
            .enumerate()
            .filter_map(|(index, route)| match Self::convert_route(route) {
                Ok(route) => Some(route),
                Err(e) => {
                    warn!(error = %e, index, "Skipping invalid route");
                    None
                },
            })
            .collect();

        debug!(count = routes.len(), "Routes converted");
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use integration_routing::{RouteResponse, RoutingConfig, RoutingError};
    use wiremock::matchers::{method, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    struct FixedProvider(Option<RouteResponse>);

    #[async_trait]
    impl RoutingProvider for FixedProvider {
        async fn driving_routes(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
            _alternatives: bool,
        ) -> Result<RouteResponse, RoutingError> {
            self.0
                .clone()
                .ok_or(RoutingError::RequestFailed("HTTP 502 Bad Gateway".to_string()))
        }
    }

    fn request() -> RouteRequest {
        RouteRequest::driving(
            Coordinate::new(51.5, -0.12).unwrap(),
            Coordinate::new(48.86, 2.35).unwrap(),
        )
    }

    fn driving_route(distance: f64) -> DrivingRoute {
        DrivingRoute {
            distance_meters: distance,
            duration_secs: 19_800.0,
            geometry: vec![(51.5, -0.12), (48.86, 2.35)],
        }
    }

    #[tokio::test]
    async fn converts_routes_in_order() {
        let adapter = DirectionsAdapter::new(Arc::new(FixedProvider(Some(RouteResponse {
            routes: vec![driving_route(343_999.0), driving_route(360_000.0)],
        }))));

        let routes = adapter.calculate(&request()).await.unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].format_distance(), "343");
        assert_eq!(routes[0].geometry().len(), 2);
        assert!(routes[0].expected_travel_time_secs().is_some());
    }

    #[tokio::test]
    async fn empty_response_is_empty_list() {
        let adapter =
            DirectionsAdapter::new(Arc::new(FixedProvider(Some(RouteResponse::default()))));
        assert!(adapter.calculate(&request()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_error_is_external_service() {
        let adapter = DirectionsAdapter::new(Arc::new(FixedProvider(None)));
        let err = adapter.calculate(&request()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }

    #[tokio::test]
    async fn invalid_route_data_is_skipped() {
        let adapter = DirectionsAdapter::new(Arc::new(FixedProvider(Some(RouteResponse {
            routes: vec![driving_route(-1.0)],
        }))));
        assert!(adapter.calculate(&request()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_alternate_keeps_primary_route() {
        let broken = DrivingRoute {
            geometry: vec![(91.0, 0.0)],
            ..driving_route(360_000.0)
        };
        let adapter = DirectionsAdapter::new(Arc::new(FixedProvider(Some(RouteResponse {
            routes: vec![driving_route(343_999.0), broken],
        }))));

        let routes = adapter.calculate(&request()).await.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].format_distance(), "343");
    }

    #[tokio::test]
    async fn osrm_adapter_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/route/v1/driving/.+"))
            .and(query_param("alternatives", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"code": "Ok", "routes": [{"distance": 343000.0, "duration": 19800.0,
                    "geometry": {"type": "LineString", "coordinates": [[-0.12, 51.5], [2.35, 48.86]]}}]}"#,
            ))
            .mount(&server)
            .await;

        let config = RoutingConfig {
            base_url: server.uri(),
            ..RoutingConfig::for_testing()
        };
        let adapter = DirectionsAdapter::osrm(OsrmRoutingClient::new(&config).unwrap());

        let routes = adapter.calculate(&request()).await.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].whole_kilometers(), 343);
    }
}
