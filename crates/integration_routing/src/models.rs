//! Routing data models
//!
//! Typed representations of geocoding candidates and driving routes as
//! returned by Nominatim and OSRM. Coordinates are plain `(latitude, longitude)`
//! pairs; validation happens when they are converted into domain types.

use serde::{Deserialize, Serialize};

/// One geocoding match for an address query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoCandidate {
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable name of the match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// One drivable route returned by OSRM
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrivingRoute {
    /// Total distance in meters
    pub distance_meters: f64,
    /// Expected travel time in seconds
    pub duration_secs: f64,
    /// Ordered `(latitude, longitude)` points of the route polyline
    pub geometry: Vec<(f64, f64)>,
}

/// Routes returned for one request, best first
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteResponse {
    pub routes: Vec<DrivingRoute>,
}

impl RouteResponse {
    /// The route the provider ranks first
    #[must_use]
    pub fn best(&self) -> Option<&DrivingRoute> {
        self.routes.first()
    }

    /// Whether no route exists between the two points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
