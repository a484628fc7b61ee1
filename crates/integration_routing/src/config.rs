//! Provider configuration
//!
//! One struct per HTTP provider. All fields have serde defaults, so a partial
//! TOML table is enough to point a client at a self-hosted instance.

use serde::{Deserialize, Serialize};

/// Configuration for the OSRM routing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Base URL for the OSRM HTTP API
    #[serde(default = "default_osrm_url")]
    pub base_url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_osrm_timeout")]
    pub timeout_secs: u64,

    /// OSRM routing profile
    #[serde(default = "default_profile")]
    pub profile: String,
}

fn default_osrm_url() -> String {
    "https://router.project-osrm.org".to_string()
}

const fn default_osrm_timeout() -> u64 {
    10
}

fn default_profile() -> String {
    "driving".to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_osrm_url(),
            timeout_secs: default_osrm_timeout(),
            profile: default_profile(),
        }
    }
}

impl RoutingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.profile.is_empty() || self.profile.contains('/') {
            return Err("profile must be a single path segment".to_string());
        }

        Ok(())
    }
}

/// Nominatim forward geocoding settings
///
/// The public instance allows one request per second per client, so
/// `min_interval_ms` defaults to slightly above that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Nominatim endpoint, without the `/search` path
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_nominatim_timeout")]
    pub timeout_secs: u64,

    /// `countrycodes` filter, e.g. "de,ch"; empty searches worldwide
    #[serde(default)]
    pub country_filter: String,

    /// Upper bound on returned candidates (1..=50)
    #[serde(default = "default_result_limit")]
    pub result_limit: u8,

    /// Minimum gap between consecutive requests in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_nominatim_timeout() -> u64 {
    5
}

const fn default_result_limit() -> u8 {
    5
}

const fn default_min_interval_ms() -> u64 {
    1100
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_url(),
            timeout_secs: default_nominatim_timeout(),
            country_filter: String::new(),
            result_limit: default_result_limit(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl NominatimConfig {
    /// Defaults without request spacing, for tests against a mock server
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            min_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check the settings before building a client
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url is required".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if !(1..=50).contains(&self.result_limit) {
            return Err(format!(
                "result_limit must be within 1..=50, got {}",
                self.result_limit
            ));
        }
        Ok(())
    }
}
