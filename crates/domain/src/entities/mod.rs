//! Domain entities

mod pin;
mod route;

pub use pin::{Pin, visited_places};
pub use route::{Route, RouteRequest, TransportMode};
