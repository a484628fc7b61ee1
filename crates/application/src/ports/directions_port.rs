//! Route computation port
//!
//! Computes driving routes between two coordinates. Adapters in the
//! infrastructure layer implement this port using a directions API.

use async_trait::async_trait;
use domain::{Route, RouteRequest};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for route computation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DirectionsPort: Send + Sync {
    /// Compute candidate routes for `request`, highest priority first
    ///
    /// An empty list means no route exists between the two points.
    async fn calculate(&self, request: &RouteRequest) -> Result<Vec<Route>, ApplicationError>;
}
