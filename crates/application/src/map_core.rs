//! Coordination core container
//!
//! Wires the services together once at startup. Nothing in the core is a
//! process-wide singleton; presentation code holds a [`MapCore`] and reaches
//! every operation through it.

use std::sync::Arc;

use domain::{AuthorizationState, MapViewport};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::error::ApplicationError;
use crate::events::EventBus;
use crate::ports::{DirectionsPort, GeocodingPort, PermissionPort, PositioningPort};
use crate::services::{
    GeocodingClient, LocationProvider, PermissionGate, PinBoard, RouteClient, RouteCoordinator,
};

/// Span of the initial map region around the user's fix
pub const INITIAL_REGION_METERS: f64 = 100_000.0;

/// The external capabilities the core depends on
#[derive(Clone)]
pub struct CorePorts {
    pub permission: Arc<dyn PermissionPort>,
    pub positioning: Arc<dyn PositioningPort>,
    pub geocoding: Arc<dyn GeocodingPort>,
    pub directions: Arc<dyn DirectionsPort>,
}

impl std::fmt::Debug for CorePorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorePorts").finish_non_exhaustive()
    }
}

/// Location & route coordination core
#[derive(Debug)]
pub struct MapCore {
    events: Arc<EventBus>,
    location: Arc<LocationProvider>,
    gate: Arc<PermissionGate>,
    geocoding: Arc<GeocodingClient>,
    routing: Arc<RouteClient>,
    routes: RouteCoordinator,
    pins: PinBoard,
}

impl MapCore {
    pub fn new(ports: CorePorts) -> Self {
        let events = Arc::new(EventBus::new());
        let location = Arc::new(LocationProvider::new(
            ports.positioning,
            Arc::clone(&ports.permission),
            Arc::clone(&events),
        ));
        let gate = Arc::new(PermissionGate::new(
            ports.permission,
            Arc::clone(&location),
            Arc::clone(&events),
        ));
        let geocoding = Arc::new(GeocodingClient::new(ports.geocoding));
        let routing = Arc::new(RouteClient::new(ports.directions));
        let routes = RouteCoordinator::new(
            Arc::clone(&location),
            Arc::clone(&geocoding),
            Arc::clone(&routing),
        );

        Self {
            events,
            location,
            gate,
            geocoding,
            routing,
            routes,
            pins: PinBoard::new(),
        }
    }

    /// Start consuming platform authorization changes
    ///
    /// The returned task ends once the sender side of `changes` is dropped,
    /// which is how the core is torn down.
    pub fn start(&self, changes: mpsc::UnboundedReceiver<AuthorizationState>) -> JoinHandle<()> {
        info!("Starting coordination core");
        tokio::spawn(Arc::clone(&self.gate).run(changes))
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn permission(&self) -> &PermissionGate {
        &self.gate
    }

    pub fn location(&self) -> &LocationProvider {
        &self.location
    }

    pub fn geocoding(&self) -> &GeocodingClient {
        &self.geocoding
    }

    pub fn routing(&self) -> &RouteClient {
        &self.routing
    }

    pub fn routes(&self) -> &RouteCoordinator {
        &self.routes
    }

    pub fn pins(&self) -> &PinBoard {
        &self.pins
    }

    /// Map region centered on the current fix
    pub fn initial_viewport(&self, width: f64, height: f64) -> Result<MapViewport, ApplicationError> {
        let fix = self
            .location
            .current_fix()
            .ok_or_else(|| ApplicationError::LocationUnavailable("no fix obtained yet".into()))?;
        Ok(MapViewport::around(
            fix.coordinate(),
            INITIAL_REGION_METERS,
            width,
            height,
        )?)
    }
}
