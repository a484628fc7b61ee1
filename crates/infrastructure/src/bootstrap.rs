//! Application assembly
//!
//! Builds the coordination core from configuration: HTTP clients for
//! geocoding and routing, the simulated device for permission and
//! positioning, and the adapters that expose them as application ports.

use std::sync::Arc;

use application::{CorePorts, MapCore};
use domain::AuthorizationState;
use integration_routing::{NominatimGeocodingClient, OsrmRoutingClient};
use tokio::sync::mpsc;
use tracing::info;

use crate::adapters::{DirectionsAdapter, GeocodingAdapter, SimulatedDevice};
use crate::config::AppConfig;
use crate::error::InfrastructureError;

/// A wired core plus the authorization stream to start it with
#[derive(Debug)]
pub struct Bootstrapped {
    pub core: MapCore,
    pub authorization_changes: mpsc::UnboundedReceiver<AuthorizationState>,
}

impl Bootstrapped {
    /// Start the core on its authorization stream
    pub fn start(self) -> (MapCore, tokio::task::JoinHandle<()>) {
        let handle = self.core.start(self.authorization_changes);
        (self.core, handle)
    }
}

/// Build the coordination core from configuration
///
/// # Errors
///
/// Returns an error if the configuration is invalid or an HTTP client
/// cannot be created.
pub fn build_core(config: &AppConfig) -> Result<Bootstrapped, InfrastructureError> {
    config.validate()?;

    let geocoder = NominatimGeocodingClient::new(&config.geocoding.to_nominatim_config())?;
    let router = OsrmRoutingClient::new(&config.routing.to_routing_config())?;
    let (device, authorization_changes) = SimulatedDevice::new(&config.device)?;
    let device = Arc::new(device);

    let ports = CorePorts {
        permission: Arc::clone(&device) as _,
        positioning: device,
        geocoding: Arc::new(GeocodingAdapter::nominatim(geocoder)),
        directions: Arc::new(DirectionsAdapter::osrm(router)),
    };

    info!(
        geocoding = %config.geocoding.base_url,
        routing = %config.routing.base_url,
        decision = %config.device.authorization,
        "Coordination core assembled"
    );

    Ok(Bootstrapped {
        core: MapCore::new(ports),
        authorization_changes,
    })
}
