//! Application layer - Use cases and orchestration
//!
//! Contains the location & route coordination core: port definitions, the
//! services that drive them, and the event bus that reports asynchronous
//! completions to the presentation layer.

pub mod cancellation;
pub mod error;
pub mod events;
mod in_flight;
pub mod map_core;
pub mod ports;
pub mod services;

pub use cancellation::{CancellationSource, CancellationToken};
pub use error::{ApplicationError, RouteFailureCause};
pub use events::{CoreEvent, EventBus, EventKind, SubscriptionId};
pub use map_core::{CorePorts, INITIAL_REGION_METERS, MapCore};
pub use ports::*;
pub use services::*;
