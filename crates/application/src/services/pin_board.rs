//! Pin board
//!
//! The set of annotated pins shown on the map. Pins come from a long press on
//! the map or from the seeded visited-places list.

use domain::{visited_places, DomainError, MapPoint, MapViewport, Pin, PinId};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::ApplicationError;

/// Ordered collection of pins
#[derive(Debug, Default)]
pub struct PinBoard {
    pins: RwLock<Vec<Pin>>,
}

impl PinBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a pin at a screen point of `viewport`
    ///
    /// An empty title still places the pin.
    pub fn add_at_point(
        &self,
        viewport: &MapViewport,
        point: MapPoint,
        title: &str,
        info: Option<&str>,
    ) -> Result<Pin, ApplicationError> {
        let coordinate = viewport.point_to_coordinate(point)?;
        let mut pin = Pin::new(coordinate, title.trim());
        if let Some(info) = info.filter(|i| !i.trim().is_empty()) {
            pin = pin.with_info(info);
        }
        Ok(self.add(pin))
    }

    /// Add a pin and return it
    pub fn add(&self, pin: Pin) -> Pin {
        debug!(id = %pin.id, title = %pin.title, "Pin added");
        self.pins.write().push(pin.clone());
        pin
    }

    /// Remove one pin
    pub fn remove(&self, id: PinId) -> Result<Pin, ApplicationError> {
        let mut pins = self.pins.write();
        let index = pins
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("Pin", id.to_string()))?;
        Ok(pins.remove(index))
    }

    /// Remove every pin, returning how many were removed
    pub fn remove_all(&self) -> usize {
        let mut pins = self.pins.write();
        let removed = pins.len();
        pins.clear();
        debug!(removed, "Pins cleared");
        removed
    }

    /// Snapshot of the pins in insertion order
    pub fn pins(&self) -> Vec<Pin> {
        self.pins.read().clone()
    }

    /// Add the visited places and return how many were added
    pub fn seed_visited_places(&self) -> usize {
        let seeded = visited_places();
        let count = seeded.len();
        self.pins.write().extend(seeded);
        count
    }

    pub fn len(&self) -> usize {
        self.pins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.read().is_empty()
    }
}
