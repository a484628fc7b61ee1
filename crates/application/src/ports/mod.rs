//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod directions_port;
mod geocoding_port;
mod permission_port;
mod positioning_port;

pub use directions_port::DirectionsPort;
#[cfg(test)]
pub use directions_port::MockDirectionsPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
#[cfg(test)]
pub use permission_port::MockPermissionPort;
pub use permission_port::PermissionPort;
#[cfg(test)]
pub use positioning_port::MockPositioningPort;
pub use positioning_port::PositioningPort;
