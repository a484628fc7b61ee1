//! Location permission port
//!
//! Interface to the platform service that owns the location authorization
//! decision. Status changes are delivered separately as a stream of
//! [`AuthorizationState`] values consumed by the permission gate.

use async_trait::async_trait;
use domain::AuthorizationState;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the platform's location authorization service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PermissionPort: Send + Sync {
    /// The platform's current authorization decision
    fn authorization_status(&self) -> AuthorizationState;

    /// Show the platform permission prompt
    ///
    /// The outcome arrives later as a status change, not as the return value.
    async fn request_authorization(&self) -> Result<(), ApplicationError>;
}
