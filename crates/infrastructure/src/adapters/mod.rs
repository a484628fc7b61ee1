//! Adapters implementing application ports
//!
//! Each adapter wraps an integration client or a platform stand-in and
//! exposes it through the port trait the coordination core expects.

mod device_adapter;
mod directions_adapter;
mod geocoding_adapter;

pub use device_adapter::SimulatedDevice;
pub use directions_adapter::DirectionsAdapter;
pub use geocoding_adapter::GeocodingAdapter;
