//! Domain layer for MapRoute
//!
//! Contains the map model: coordinates, device fixes, authorization states,
//! pins, routes, and the viewport projection. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
