//! Value Objects - Immutable, identity-less domain primitives

mod authorization_state;
mod coordinate;
mod location_fix;
mod map_viewport;
mod pin_id;

pub use authorization_state::AuthorizationState;
pub use coordinate::Coordinate;
pub use location_fix::LocationFix;
pub use map_viewport::{MAX_MERCATOR_LATITUDE, MapPoint, MapViewport};
pub use pin_id::PinId;
