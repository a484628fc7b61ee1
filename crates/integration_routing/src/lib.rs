//! Geocoding and driving directions for MapRoute
//!
//! Provides forward geocoding via [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org)
//! and driving routes via the [OSRM](https://project-osrm.org) HTTP API.
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern. [`RoutingProvider`] defines the
//! interface for route computation, implemented by [`OsrmRoutingClient`].
//! [`GeocodingProvider`] handles address-to-coordinate conversion via
//! [`NominatimGeocodingClient`]. Neither client caches or retries.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::Coordinate;
//! use integration_routing::{OsrmRoutingClient, RoutingConfig, RoutingProvider};
//!
//! let client = OsrmRoutingClient::new(&RoutingConfig::default())?;
//! let response = client
//!     .driving_routes(
//!         Coordinate::new(51.5, -0.12)?,  // London
//!         Coordinate::new(48.86, 2.35)?,  // Paris
//!         true,                           // ask for alternatives
//!     )
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod geocoding;
mod models;

pub use client::{OsrmRoutingClient, RoutingProvider};
pub use config::{NominatimConfig, RoutingConfig};
pub use error::{GeocodingError, RoutingError};
pub use geocoding::{GeocodingProvider, NominatimGeocodingClient};
pub use models::{DrivingRoute, GeoCandidate, RouteResponse};
