//! Simulated device configuration
//!
//! Hosts without platform location services use a simulated device: a fixed
//! authorization decision revealed when the user is prompted, and a fixed
//! location reported for every positioning request.

use domain::AuthorizationState;
use serde::{Deserialize, Serialize};

use super::integrations::GeoLocationConfig;

/// Simulated permission and positioning device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Decision the simulated user makes when prompted
    #[serde(default = "default_authorization")]
    pub authorization: AuthorizationState,

    /// Reported location; positioning fails when unset
    #[serde(default)]
    pub location: Option<GeoLocationConfig>,

    /// Simulated positioning latency in milliseconds
    #[serde(default)]
    pub positioning_delay_ms: u64,
}

const fn default_authorization() -> AuthorizationState {
    AuthorizationState::AuthorizedWhenInUse
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            authorization: default_authorization(),
            location: None,
            positioning_delay_ms: 0,
        }
    }
}

impl DeviceConfig {
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            location: Some(GeoLocationConfig {
                latitude: 51.5,
                longitude: -0.12,
            }),
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured location is out of range.
    pub fn validate(&self) -> Result<(), String> {
        match self.location {
            Some(location) if location.to_coordinate().is_none() => Err(format!(
                "location ({}, {}) is out of range",
                location.latitude, location.longitude
            )),
            _ => Ok(()),
        }
    }
}
