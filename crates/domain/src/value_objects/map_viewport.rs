//! Map viewport and screen-point conversion
//!
//! Converts between points on the visible map surface (pixels, origin at the
//! top-left corner) and geographic coordinates using the Web Mercator
//! projection with 256px tiles.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::Coordinate;
use crate::errors::DomainError;

const TILE_SIZE: f64 = 256.0;
const MAX_ZOOM: f64 = 22.0;
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator projection
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// A point on the map surface in pixels, relative to the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    /// Horizontal offset in pixels
    pub x: f64,
    /// Vertical offset in pixels (grows downwards)
    pub y: f64,
}

impl MapPoint {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The visible region of the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapViewport {
    center: Coordinate,
    zoom: f64,
    width: f64,
    height: f64,
}

impl MapViewport {
    /// Create a viewport centered on `center`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the size is not positive or the
    /// zoom level is outside `0..=22`.
    pub fn new(center: Coordinate, zoom: f64, width: f64, height: f64) -> Result<Self, DomainError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(DomainError::ValidationError(format!(
                "viewport size must be positive, got {width}x{height}"
            )));
        }
        if !(0.0..=MAX_ZOOM).contains(&zoom) {
            return Err(DomainError::ValidationError(format!(
                "zoom must be between 0 and {MAX_ZOOM}, got {zoom}"
            )));
        }
        Ok(Self {
            center,
            zoom,
            width,
            height,
        })
    }

    /// Create a viewport that shows roughly `span_meters` around `center`
    /// along its shorter side
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for a non-positive span or size.
    pub fn around(
        center: Coordinate,
        span_meters: f64,
        width: f64,
        height: f64,
    ) -> Result<Self, DomainError> {
        if !span_meters.is_finite() || span_meters <= 0.0 {
            return Err(DomainError::ValidationError(format!(
                "span must be positive, got {span_meters}"
            )));
        }
        let shorter_side = width.min(height);
        let latitude = center
            .latitude()
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let circumference = 2.0 * PI * EARTH_RADIUS_M * latitude.to_radians().cos();
        let world_size = circumference * shorter_side / span_meters;
        let zoom = (world_size / TILE_SIZE).log2().clamp(0.0, MAX_ZOOM);
        Self::new(center, zoom, width, height)
    }

    /// Center of the viewport
    #[must_use]
    pub const fn center(&self) -> Coordinate {
        self.center
    }

    /// Zoom level
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Width and height in pixels
    #[must_use]
    pub const fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Convert a point on the map surface to a coordinate
    ///
    /// Longitudes that run past the antimeridian are wrapped into range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if the point does not map to a
    /// finite coordinate.
    pub fn point_to_coordinate(&self, point: MapPoint) -> Result<Coordinate, DomainError> {
        let (cx, cy) = self.project(self.center);
        let world_x = cx + point.x - self.width / 2.0;
        let world_y = cy + point.y - self.height / 2.0;
        let size = self.world_size();

        let longitude = (world_x / size).mul_add(360.0, -180.0);
        let longitude = (longitude + 180.0).rem_euclid(360.0) - 180.0;
        let n = PI - 2.0 * PI * world_y / size;
        let latitude = n.sinh().atan().to_degrees();

        Coordinate::new(latitude, longitude)
    }

    /// Convert a coordinate to a point on the map surface
    ///
    /// The point may lie outside the visible bounds.
    #[must_use]
    pub fn coordinate_to_point(&self, coordinate: Coordinate) -> MapPoint {
        let (cx, cy) = self.project(self.center);
        let (x, y) = self.project(coordinate);
        MapPoint::new(x - cx + self.width / 2.0, y - cy + self.height / 2.0)
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    fn project(&self, coordinate: Coordinate) -> (f64, f64) {
        let size = self.world_size();
        let x = (coordinate.longitude() + 180.0) / 360.0 * size;
        let sin = coordinate
            .latitude()
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
            .to_radians()
            .sin();
        let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * size;
        (x, y)
    }
}
