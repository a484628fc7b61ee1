//! Forward geocoding against a Nominatim `/search` endpoint
//!
//! Candidates come back in the service's relevance order and are passed on
//! unchanged; choosing one is up to the caller. A request is never sent for
//! blank input, and consecutive requests are spaced by `min_interval_ms`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::config::NominatimConfig;
use crate::error::GeocodingError;
use crate::models::GeoCandidate;

/// Address-to-coordinate lookup
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Candidates for `address`, best match first; empty when nothing matches
    async fn geocode(&self, address: &str) -> Result<Vec<GeoCandidate>, GeocodingError>;
}

/// HTTP client for Nominatim
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    http: Client,
    config: NominatimConfig,
    next_slot: Mutex<Option<Instant>>,
}

impl NominatimGeocodingClient {
    /// Build a client from validated settings
    ///
    /// # Errors
    ///
    /// Fails on invalid settings or when the HTTP client cannot be built.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        config.validate().map_err(GeocodingError::ConfigurationError)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("MapRoute/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http,
            config: config.clone(),
            next_slot: Mutex::new(None),
        })
    }

    /// Wait until the next request slot, then reserve the following one
    async fn throttle(&self) {
        let mut slot = self.next_slot.lock().await;
        if let Some(at) = slot.filter(|at| *at > Instant::now()) {
            let wait = at.saturating_duration_since(Instant::now());
            debug!(?wait, "Spacing geocoding requests");
            tokio::time::sleep_until(at).await;
        }
        *slot = Some(Instant::now() + Duration::from_millis(self.config.min_interval_ms));
    }

    fn query(&self, address: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("q", address.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", self.config.result_limit.to_string()),
        ];
        if !self.config.country_filter.is_empty() {
            query.push(("countrycodes", self.config.country_filter.clone()));
        }
        query
    }

    fn parse_candidates(body: &str) -> Result<Vec<GeoCandidate>, GeocodingError> {
        let places: Vec<Place> =
            serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        Ok(places
            .into_iter()
            .enumerate()
            .filter_map(|(index, place)| match place.into_candidate() {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    warn!(error = %e, index, "Skipping unreadable Nominatim entry");
                    None
                },
            })
            .collect())
    }
}

#[async_trait]
impl GeocodingProvider for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Vec<GeoCandidate>, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(Vec::new());
        }

        self.throttle().await;

        let response = self
            .http
            .get(format!("{}/search", self.config.base_url.trim_end_matches('/')))
            .query(&self.query(address))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Nominatim throttled the request");
                return Err(GeocodingError::RateLimitExceeded);
            },
            StatusCode::BAD_REQUEST => {
                return Err(GeocodingError::QueryRejected(address.to_string()));
            },
            status if !status.is_success() => {
                return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
            },
            _ => {},
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let candidates = Self::parse_candidates(&body)?;
        debug!(count = candidates.len(), "Nominatim candidates received");
        Ok(candidates)
    }
}

/// One entry of a `jsonv2` search result; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct Place {
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lon: String,
    display_name: Option<String>,
}

impl Place {
    fn into_candidate(self) -> Result<GeoCandidate, GeocodingError> {
        let number = |field: &str, raw: &str| {
            raw.parse::<f64>()
                .map_err(|_| GeocodingError::ParseError(format!("{field} is not a number: {raw}")))
        };
        Ok(GeoCandidate {
            latitude: number("lat", &self.lat)?,
            longitude: number("lon", &self.lon)?,
            display_name: self.display_name,
        })
    }
}
