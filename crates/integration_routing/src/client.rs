//! OSRM routing client
//!
//! Computes driving routes with the [OSRM](https://project-osrm.org) `route`
//! service. OSRM reports "no route" as a response code rather than an HTTP
//! error; those answers are returned as an empty [`RouteResponse`].

use std::time::Duration;

use async_trait::async_trait;
use domain::Coordinate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::models::{DrivingRoute, RouteResponse};

/// OSRM codes that mean the request was fine but no route exists
const NO_ROUTE_CODES: [&str; 2] = ["NoRoute", "NoSegment"];

/// Trait for routing service clients
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Compute driving routes between two coordinates, best first
    async fn driving_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        alternatives: bool,
    ) -> Result<RouteResponse, RoutingError>;
}

/// OSRM-based routing client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: RoutingConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM routing client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        config.validate().map_err(RoutingError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("MapRoute/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// `route` service URL; OSRM expects `longitude,latitude` pairs
    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude(),
        )
    }

    /// Parse the raw OSRM JSON response into typed routes
    fn parse_route_response(body: &str) -> Result<RouteResponse, RoutingError> {
        let raw: RawRouteResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;
        Self::convert_response(raw)
    }

    fn convert_response(raw: RawRouteResponse) -> Result<RouteResponse, RoutingError> {
        if NO_ROUTE_CODES.contains(&raw.code.as_str()) {
            debug!(code = %raw.code, "No route between points");
            return Ok(RouteResponse::default());
        }

        if raw.code != "Ok" {
            return Err(RoutingError::Rejected {
                code: raw.code,
                message: raw.message.unwrap_or_default(),
            });
        }

        Ok(RouteResponse {
            routes: raw.routes.into_iter().map(Self::convert_route).collect(),
        })
    }

    /// Convert a raw route; GeoJSON positions are `[longitude, latitude]`
    fn convert_route(raw: RawRoute) -> DrivingRoute {
        DrivingRoute {
            distance_meters: raw.distance,
            duration_secs: raw.duration,
            geometry: raw
                .geometry
                .map(|g| g.coordinates.into_iter().map(|[lon, lat]| (lat, lon)).collect())
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl RoutingProvider for OsrmRoutingClient {
    #[instrument(skip(self), fields(origin = %origin, destination = %destination))]
    async fn driving_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        alternatives: bool,
    ) -> Result<RouteResponse, RoutingError> {
        let url = self.route_url(origin, destination);
        let params = [
            ("alternatives", alternatives.to_string()),
            ("overview", "full".to_string()),
            ("geometries", "geojson".to_string()),
            ("steps", "false".to_string()),
        ];

        debug!(?url, "Requesting driving routes");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RoutingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        // OSRM answers 400 with a JSON code for NoRoute/InvalidQuery; only fall
        // back to the HTTP status when the body is not an OSRM response.
        let result = match serde_json::from_str::<RawRouteResponse>(&body) {
            Ok(raw) => Self::convert_response(raw)?,
            Err(_) if !status.is_success() => {
                return Err(RoutingError::RequestFailed(format!("HTTP {status}")));
            },
            Err(e) => return Err(RoutingError::ParseError(e.to_string())),
        };

        if result.is_empty() {
            warn!("No routes found");
        }

        debug!(count = result.routes.len(), "Routes found");
        Ok(result)
    }
}

// Raw OSRM API types

#[derive(Debug, Deserialize)]
struct RawRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    distance: f64,
    duration: f64,
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    coordinates: Vec<[f64; 2]>,
}
