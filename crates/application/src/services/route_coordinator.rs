//! Route coordinator
//!
//! Runs one "create route" cycle: current fix as origin, geocoded address as
//! destination, first computed route as result. Only one cycle runs at a time
//! and a new cycle always discards the previous route first.

use std::sync::Arc;

use domain::{Coordinate, Route, RouteRequest};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::cancellation::CancellationToken;
use crate::error::ApplicationError;
use crate::in_flight::InFlight;
use crate::services::{GeocodingClient, LocationProvider, RouteClient};

/// A computed route together with the request that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    pub request: RouteRequest,
    pub route: Route,
}

/// Orchestrates geocoding and routing for the user's address input
pub struct RouteCoordinator {
    location: Arc<LocationProvider>,
    geocoding: Arc<GeocodingClient>,
    routing: Arc<RouteClient>,
    current: Mutex<Option<PlannedRoute>>,
    in_flight: InFlight,
}

impl std::fmt::Debug for RouteCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCoordinator")
            .field("has_route", &self.current.lock().is_some())
            .field("in_flight", &self.in_flight.is_busy())
            .finish_non_exhaustive()
    }
}

impl RouteCoordinator {
    pub fn new(
        location: Arc<LocationProvider>,
        geocoding: Arc<GeocodingClient>,
        routing: Arc<RouteClient>,
    ) -> Self {
        Self {
            location,
            geocoding,
            routing,
            current: Mutex::new(None),
            in_flight: InFlight::new("create-route"),
        }
    }

    /// Plan a driving route from the current fix to `address`
    ///
    /// Completes exactly once: with the stored route, with the first failure
    /// of the cycle, or with [`ApplicationError::Cancelled`] when `cancel`
    /// fires first. No route is stored unless the whole cycle succeeds.
    #[instrument(skip(self, cancel))]
    pub async fn create_route(
        &self,
        address: &str,
        cancel: CancellationToken,
    ) -> Result<PlannedRoute, ApplicationError> {
        let _guard = self.in_flight.begin()?;
        self.current.lock().take();

        if cancel.is_cancelled() {
            return Err(ApplicationError::Cancelled);
        }

        let origin = self
            .location
            .current_fix()
            .ok_or_else(|| ApplicationError::LocationUnavailable("no fix obtained yet".into()))?
            .coordinate();

        let address = address.trim();
        if address.is_empty() {
            return Err(ApplicationError::EmptyInput);
        }

        let planned = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!("Route planning cancelled");
                return Err(ApplicationError::Cancelled);
            }
            result = self.plan(origin, address) => result?,
        };

        info!(
            distance_km = planned.route.whole_kilometers(),
            "Route planned"
        );
        *self.current.lock() = Some(planned.clone());
        Ok(planned)
    }

    async fn plan(
        &self,
        origin: Coordinate,
        address: &str,
    ) -> Result<PlannedRoute, ApplicationError> {
        let destination = self.geocoding.resolve(address).await?;
        debug!(%destination, "Destination resolved");

        let request = RouteRequest::driving(origin, destination);
        let route = self.routing.compute(&request).await.inspect_err(|e| {
            warn!(error = %e, "Route computation failed");
        })?;
        Ok(PlannedRoute { request, route })
    }

    /// Discard the stored route and return the coordinate to recenter on
    pub fn clear_route(&self) -> Result<Coordinate, ApplicationError> {
        if self.current.lock().take().is_some() {
            debug!("Route cleared");
        }
        self.location
            .current_fix()
            .map(|fix| fix.coordinate())
            .ok_or_else(|| ApplicationError::LocationUnavailable("no fix obtained yet".into()))
    }

    /// The route from the last successful cycle, if not cleared since
    pub fn current_route(&self) -> Option<PlannedRoute> {
        self.current.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use domain::{AuthorizationState, LocationFix};

    use super::*;
    use crate::cancellation::CancellationSource;
    use crate::error::RouteFailureCause;
    use crate::events::EventBus;
    use crate::ports::{
        MockDirectionsPort, MockGeocodingPort, MockPermissionPort, MockPositioningPort,
    };

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn london() -> Coordinate {
        coord(51.5, -0.12)
    }

    fn paris() -> Coordinate {
        coord(48.86, 2.35)
    }

    async fn provider_with_fix(has_fix: bool) -> Arc<LocationProvider> {
        let mut permission = MockPermissionPort::new();
        permission
            .expect_authorization_status()
            .returning(|| AuthorizationState::AuthorizedWhenInUse);
        let mut positioning = MockPositioningPort::new();
        positioning
            .expect_request_location()
            .returning(|| Ok(LocationFix::now(london())));

        let provider = Arc::new(LocationProvider::new(
            Arc::new(positioning),
            Arc::new(permission),
            Arc::new(EventBus::new()),
        ));
        if has_fix {
            provider.request_one_fix().await.unwrap();
        }
        provider
    }

    fn geocoder(result: Vec<Coordinate>) -> Arc<GeocodingClient> {
        let mut port = MockGeocodingPort::new();
        port.expect_geocode().returning(move |_| Ok(result.clone()));
        Arc::new(GeocodingClient::new(Arc::new(port)))
    }

    fn router(meters: Option<f64>) -> Arc<RouteClient> {
        let mut port = MockDirectionsPort::new();
        port.expect_calculate().returning(move |r| {
            Ok(meters
                .map(|m| Route::new(vec![r.origin, r.destination], m).unwrap())
                .into_iter()
                .collect())
        });
        Arc::new(RouteClient::new(Arc::new(port)))
    }

    #[tokio::test]
    async fn create_route_stores_first_route() {
        let coordinator = RouteCoordinator::new(
            provider_with_fix(true).await,
            geocoder(vec![paris()]),
            router(Some(343_000.0)),
        );

        let planned = coordinator
            .create_route("Paris", CancellationToken::never())
            .await
            .unwrap();

        assert_eq!(planned.request.origin, london());
        assert_eq!(planned.request.destination, paris());
        assert_eq!(planned.route.format_distance(), "343");
        assert_eq!(coordinator.current_route(), Some(planned));
    }

    #[tokio::test]
    async fn create_route_without_fix_fails() {
        let coordinator = RouteCoordinator::new(
            provider_with_fix(false).await,
            geocoder(vec![paris()]),
            router(Some(1.0)),
        );

        let err = coordinator
            .create_route("Paris", CancellationToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::LocationUnavailable(_)));
    }

    #[tokio::test]
    async fn blank_address_is_empty_input() {
        let mut port = MockGeocodingPort::new();
        port.expect_geocode().never();
        let coordinator = RouteCoordinator::new(
            provider_with_fix(true).await,
            Arc::new(GeocodingClient::new(Arc::new(port))),
            router(Some(1.0)),
        );

        let err = coordinator
            .create_route("   ", CancellationToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::EmptyInput));
    }

    #[tokio::test]
    async fn unknown_address_keeps_no_route() {
        let coordinator = RouteCoordinator::new(
            provider_with_fix(true).await,
            geocoder(vec![]),
            router(Some(1.0)),
        );

        let err = coordinator
            .create_route("Atlantis", CancellationToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::AddressNotFound(_)));
        assert!(coordinator.current_route().is_none());
    }

    #[tokio::test]
    async fn failed_cycle_discards_previous_route() {
        let coordinator = RouteCoordinator::new(
            provider_with_fix(true).await,
            geocoder(vec![paris()]),
            router(None),
        );
        *coordinator.current.lock() = Some(PlannedRoute {
            request: RouteRequest::driving(london(), paris()),
            route: Route::new(vec![], 10.0).unwrap(),
        });

        let err = coordinator
            .create_route("Paris", CancellationToken::never())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::RouteUnavailable {
                cause: RouteFailureCause::NoRoute,
                ..
            }
        ));
        assert!(coordinator.current_route().is_none());
    }

    #[tokio::test]
    async fn pre_cancelled_token_completes_with_cancelled() {
        let coordinator = RouteCoordinator::new(
            provider_with_fix(true).await,
            geocoder(vec![paris()]),
            router(Some(1.0)),
        );
        let source = CancellationSource::new();
        source.cancel();

        let err = coordinator
            .create_route("Paris", source.token())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Cancelled));
        assert!(coordinator.current_route().is_none());
    }

    #[tokio::test]
    async fn cancel_during_slow_geocoding() {
        struct SlowGeocoder;

        #[async_trait::async_trait]
        impl crate::ports::GeocodingPort for SlowGeocoder {
            async fn geocode(&self, _address: &str) -> Result<Vec<Coordinate>, ApplicationError> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(vec![])
            }
        }

        let coordinator = Arc::new(RouteCoordinator::new(
            provider_with_fix(true).await,
            Arc::new(GeocodingClient::new(Arc::new(SlowGeocoder))),
            router(Some(1.0)),
        ));
        let source = CancellationSource::new();
        let token = source.token();
        let task = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.create_route("Paris", token).await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        source.cancel();

        let result = tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("cycle should finish after cancel")
            .unwrap();
        assert!(matches!(result, Err(ApplicationError::Cancelled)));
        assert!(coordinator.current_route().is_none());
    }

    #[tokio::test]
    async fn clear_route_returns_fix_coordinate() {
        let coordinator = RouteCoordinator::new(
            provider_with_fix(true).await,
            geocoder(vec![paris()]),
            router(Some(343_000.0)),
        );
        coordinator
            .create_route("Paris", CancellationToken::never())
            .await
            .unwrap();

        let center = coordinator.clear_route().unwrap();
        assert_eq!(center, london());
        assert!(coordinator.current_route().is_none());
    }

    #[tokio::test]
    async fn clear_route_without_fix_is_unavailable() {
        let coordinator = RouteCoordinator::new(
            provider_with_fix(false).await,
            geocoder(vec![]),
            router(None),
        );
        assert!(matches!(
            coordinator.clear_route(),
            Err(ApplicationError::LocationUnavailable(_))
        ));
    }
}
