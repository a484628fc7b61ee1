//! Application configuration
//!
//! Split into focused sub-modules:
//! - `integrations`: Nominatim geocoding and OSRM routing
//! - `device`: the simulated permission/positioning device
//!
//! Logging settings live next to the subscriber setup in
//! [`crate::telemetry::TelemetryConfig`].

mod device;
mod integrations;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InfrastructureError;
use crate::telemetry::TelemetryConfig;

pub use device::DeviceConfig;
pub use integrations::{GeoLocationConfig, GeocodingAppConfig, RoutingAppConfig};

/// Environment variable prefix, e.g. `MAPROUTE_ROUTING__BASE_URL`
pub const ENV_PREFIX: &str = "MAPROUTE";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Geocoding service configuration
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// Routing service configuration
    #[serde(default)]
    pub routing: RoutingAppConfig,

    /// Simulated device configuration
    #[serde(default)]
    pub device: DeviceConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional `config.toml`
    pub fn load() -> Result<Self, InfrastructureError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of `config.toml` when given
    ///
    /// Sources in increasing priority: defaults, the file, then
    /// `MAPROUTE_*` environment variables with `__` between nested keys.
    pub fn load_from(path: Option<&Path>) -> Result<Self, InfrastructureError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("geocoding.base_url", "https://nominatim.openstreetmap.org")?
            .set_default("routing.base_url", "https://router.project-osrm.org")?
            .add_source(file)
            // Override with environment variables (e.g., MAPROUTE_ROUTING__TIMEOUT_SECS)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Configuration suitable for tests: short timeouts, no rate limiting
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            telemetry: TelemetryConfig::default(),
            geocoding: GeocodingAppConfig::for_testing(),
            routing: RoutingAppConfig::for_testing(),
            device: DeviceConfig::for_testing(),
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        let invalid = |section: &str, reason: String| {
            InfrastructureError::InvalidConfig(format!("{section}: {reason}"))
        };

        self.geocoding
            .to_nominatim_config()
            .validate()
            .map_err(|e| invalid("geocoding", e))?;
        self.routing
            .to_routing_config()
            .validate()
            .map_err(|e| invalid("routing", e))?;
        self.device.validate().map_err(|e| invalid("device", e))?;
        Ok(())
    }
}
