//! Infrastructure layer - Adapters, configuration, and logging
//!
//! Implements the application ports on top of the HTTP integrations and the
//! simulated device, loads layered configuration, and assembles the
//! coordination core.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod telemetry;

pub use adapters::{DirectionsAdapter, GeocodingAdapter, SimulatedDevice};
pub use bootstrap::{Bootstrapped, build_core};
pub use config::AppConfig;
pub use error::InfrastructureError;
pub use telemetry::{LogFormat, TelemetryConfig, init_logging};
