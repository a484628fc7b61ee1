//! Observed device location

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Coordinate;

/// A single observed device location with the time it was observed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    coordinate: Coordinate,
    observed_at: DateTime<Utc>,
}

impl LocationFix {
    /// Create a fix observed at the given time
    #[must_use]
    pub const fn new(coordinate: Coordinate, observed_at: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            observed_at,
        }
    }

    /// Create a fix observed now
    #[must_use]
    pub fn now(coordinate: Coordinate) -> Self {
        Self::new(coordinate, Utc::now())
    }

    /// The observed coordinate
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// When the fix was observed
    #[must_use]
    pub const fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

impl fmt::Display for LocationFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {}",
            self.coordinate,
            self.observed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
