//! Integration configurations: Nominatim geocoding and OSRM routing.

use serde::{Deserialize, Serialize};

// ==============================
// Shared
// ==============================

/// Geographic location configuration (latitude/longitude pair)
///
/// Configured as inline table: `{ latitude = 52.52, longitude = 13.405 }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocationConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
}

impl GeoLocationConfig {
    /// Convert to domain `Coordinate` value object
    ///
    /// Returns `None` if coordinates are invalid.
    #[must_use]
    pub fn to_coordinate(&self) -> Option<domain::Coordinate> {
        domain::Coordinate::new(self.latitude, self.longitude).ok()
    }
}

// ==============================
// Geocoding Configuration
// ==============================

/// Forward geocoding configuration (Nominatim)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingAppConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 5)
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,

    /// Country codes to restrict results to, e.g. "de,ch" (default: worldwide)
    #[serde(default)]
    pub country_filter: String,

    /// Maximum number of candidates to request (default: 5)
    #[serde(default = "default_result_limit")]
    pub result_limit: u8,

    /// Minimum spacing between requests in milliseconds (default: 1100)
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_geocoding_timeout() -> u64 {
    5
}

const fn default_result_limit() -> u8 {
    5
}

const fn default_min_interval_ms() -> u64 {
    1100
}

impl Default for GeocodingAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_geocoding_timeout(),
            country_filter: String::new(),
            result_limit: default_result_limit(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl GeocodingAppConfig {
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            min_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Convert to `integration_routing::NominatimConfig`
    #[must_use]
    pub fn to_nominatim_config(&self) -> integration_routing::NominatimConfig {
        integration_routing::NominatimConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            country_filter: self.country_filter.clone(),
            result_limit: self.result_limit,
            min_interval_ms: self.min_interval_ms,
        }
    }
}

// ==============================
// Routing Configuration
// ==============================

/// Driving directions configuration (OSRM)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingAppConfig {
    /// Base URL for the OSRM HTTP API
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_routing_timeout")]
    pub timeout_secs: u64,

    /// OSRM profile (default: driving)
    #[serde(default = "default_profile")]
    pub profile: String,
}

fn default_routing_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

const fn default_routing_timeout() -> u64 {
    10
}

fn default_profile() -> String {
    "driving".to_string()
}

impl Default for RoutingAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_routing_base_url(),
            timeout_secs: default_routing_timeout(),
            profile: default_profile(),
        }
    }
}

impl RoutingAppConfig {
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Convert to `integration_routing::RoutingConfig`
    #[must_use]
    pub fn to_routing_config(&self) -> integration_routing::RoutingConfig {
        integration_routing::RoutingConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            profile: self.profile.clone(),
        }
    }
}
