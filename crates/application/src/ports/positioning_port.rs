//! Device positioning port
//!
//! One-shot "where am I" request against the platform positioning service.

use async_trait::async_trait;
use domain::LocationFix;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the platform's one-shot positioning service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PositioningPort: Send + Sync {
    /// Request a single fresh fix
    ///
    /// Resolves exactly once with either the fix or the positioning error.
    async fn request_location(&self) -> Result<LocationFix, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn PositioningPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PositioningPort>();
    }
}
