//! Route client
//!
//! Computes a driving route between two coordinates. The provider is asked for
//! alternates, but only the first route returned is kept.

use std::sync::Arc;

use domain::{Coordinate, Route, RouteRequest};
use tracing::{debug, instrument, warn};

use crate::error::{ApplicationError, RouteFailureCause};
use crate::in_flight::InFlight;
use crate::ports::DirectionsPort;

/// Route computation with one outstanding request at a time
pub struct RouteClient {
    port: Arc<dyn DirectionsPort>,
    in_flight: InFlight,
}

impl std::fmt::Debug for RouteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteClient")
            .field("in_flight", &self.in_flight.is_busy())
            .finish_non_exhaustive()
    }
}

impl RouteClient {
    pub fn new(port: Arc<dyn DirectionsPort>) -> Self {
        Self {
            port,
            in_flight: InFlight::new("route"),
        }
    }

    /// Compute a driving route from `origin` to `destination`
    pub async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Route, ApplicationError> {
        self.compute(&RouteRequest::driving(origin, destination)).await
    }

    /// Execute a prepared request
    ///
    /// Every failure is reported as [`ApplicationError::RouteUnavailable`].
    #[instrument(skip(self), fields(origin = %request.origin, destination = %request.destination))]
    pub async fn compute(&self, request: &RouteRequest) -> Result<Route, ApplicationError> {
        let _guard = self.in_flight.begin()?;

        let routes = self.port.calculate(request).await.map_err(|e| {
            warn!(error = %e, cause = %RouteFailureCause::Transport, "Route request failed");
            ApplicationError::route_unavailable(RouteFailureCause::Transport, e.to_string())
        })?;

        debug!(count = routes.len(), "Routes received");
        routes.into_iter().next().ok_or_else(|| {
            warn!(cause = %RouteFailureCause::NoRoute, "Provider returned no route");
            ApplicationError::route_unavailable(
                RouteFailureCause::NoRoute,
                "no route between the two locations",
            )
        })
    }
}
