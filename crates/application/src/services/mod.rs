//! Application services - Use case implementations

mod geocoding_client;
mod location_provider;
mod permission_gate;
mod pin_board;
mod route_client;
mod route_coordinator;

pub use geocoding_client::GeocodingClient;
pub use location_provider::LocationProvider;
pub use permission_gate::{GateState, PermissionGate};
pub use pin_board::PinBoard;
pub use route_client::RouteClient;
pub use route_coordinator::{PlannedRoute, RouteCoordinator};
