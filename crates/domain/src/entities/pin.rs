//! Map pin entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{Coordinate, PinId};

/// An annotated pin on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Unique pin identifier
    pub id: PinId,
    /// Where the pin is placed
    pub coordinate: Coordinate,
    /// User-supplied title
    pub title: String,
    /// Optional descriptive text shown under the title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl Pin {
    /// Create a new pin with a fresh ID
    #[must_use]
    pub fn new(coordinate: Coordinate, title: impl Into<String>) -> Self {
        Self {
            id: PinId::new(),
            coordinate,
            title: title.into(),
            info: None,
        }
    }

    /// Attach descriptive text
    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }
}

/// The seeded list of places the user has visited
#[must_use]
pub fn visited_places() -> Vec<Pin> {
    [
        ("Florence", 43.769_562, 11.255_814, "Leap of faith"),
        ("Rome", 41.902_782, 12.496_366, "Good pasta"),
        ("Berlin", 52.520_008, 13.404_954, "Ich bin ein Berliner"),
        ("Luxembourg", 49.611_622, 6.131_935, "Very nice city"),
        ("Zurich", 47.373_878, 8.545_094, "Flamingos walking around"),
    ]
    .into_iter()
    .map(|(title, lat, lon, info)| {
        Pin::new(Coordinate::new_unchecked(lat, lon), title).with_info(info)
    })
    .collect()
}
