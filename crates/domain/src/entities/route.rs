//! Route request and computed route

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;
use crate::value_objects::Coordinate;

/// How the route will be travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Driving by car
    #[default]
    Automobile,
}

impl TransportMode {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Automobile => "automobile",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A request to compute a route between two coordinates
///
/// Created fresh for every "create route" action and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Start of the route (the user's fix)
    pub origin: Coordinate,
    /// End of the route (the geocoded address)
    pub destination: Coordinate,
    /// Transport mode, always automobile
    pub transport_mode: TransportMode,
    /// Ask the provider for alternate routes as well
    pub requests_alternates: bool,
}

impl RouteRequest {
    /// A driving request that asks for alternates
    #[must_use]
    pub const fn driving(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            transport_mode: TransportMode::Automobile,
            requests_alternates: true,
        }
    }
}

/// A drivable path returned by the route provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    geometry: Vec<Coordinate>,
    distance_meters: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_travel_time_secs: Option<f64>,
}

impl Route {
    /// Create a route from its geometry and total distance
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the distance is negative or not finite.
    pub fn new(geometry: Vec<Coordinate>, distance_meters: f64) -> Result<Self, DomainError> {
        if !distance_meters.is_finite() || distance_meters < 0.0 {
            return Err(DomainError::ValidationError(format!(
                "route distance must be a non-negative number of meters, got {distance_meters}"
            )));
        }
        Ok(Self {
            geometry,
            distance_meters,
            expected_travel_time_secs: None,
        })
    }

    /// Attach the provider's expected travel time
    #[must_use]
    pub fn with_travel_time(mut self, seconds: f64) -> Self {
        self.expected_travel_time_secs = Some(seconds);
        self
    }

    /// Ordered polyline of the route
    #[must_use]
    pub fn geometry(&self) -> &[Coordinate] {
        &self.geometry
    }

    /// Total distance in meters
    #[must_use]
    pub const fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Expected travel time in seconds, if the provider reported one
    #[must_use]
    pub const fn expected_travel_time_secs(&self) -> Option<f64> {
        self.expected_travel_time_secs
    }

    /// Total distance in whole kilometers
    ///
    /// Truncates, never rounds: 343,999 m is 343 km.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn whole_kilometers(&self) -> u64 {
        (self.distance_meters / 1000.0).trunc() as u64
    }

    /// Distance label shown next to the route
    #[must_use]
    pub fn format_distance(&self) -> String {
        self.whole_kilometers().to_string()
    }
}
