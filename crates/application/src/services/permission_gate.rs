//! Permission gate
//!
//! Owns the device-location authorization lifecycle and turns platform
//! authorization changes into positioning requests or a terminal
//! [`CoreEvent::AccessDenied`].
//!
//! ```text
//! NotDetermined -> Requesting -> Authorized -> FixRequested -> FixObtained
//!                             \-> Denied (terminal)
//! FixRequested -(positioning error)-> Authorized
//! ```

use std::fmt;
use std::sync::Arc;

use domain::AuthorizationState;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::events::{CoreEvent, EventBus};
use crate::ports::PermissionPort;
use crate::services::LocationProvider;

/// Combined authorization and acquisition state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// Nothing asked yet
    #[default]
    NotDetermined,
    /// A platform prompt is outstanding
    Requesting,
    /// Access granted, no fix requested yet
    Authorized,
    /// A fix request is outstanding
    FixRequested,
    /// A fix was obtained
    FixObtained,
    /// Access denied or restricted; terminal
    Denied,
}

impl GateState {
    /// Whether no further automatic transition happens
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Denied)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotDetermined => "not_determined",
            Self::Requesting => "requesting",
            Self::Authorized => "authorized",
            Self::FixRequested => "fix_requested",
            Self::FixObtained => "fix_obtained",
            Self::Denied => "denied",
        };
        f.write_str(s)
    }
}

/// Drives the location provider from platform authorization changes
pub struct PermissionGate {
    permission: Arc<dyn PermissionPort>,
    location: Arc<LocationProvider>,
    events: Arc<EventBus>,
    state: Mutex<GateState>,
}

impl fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionGate")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl PermissionGate {
    pub fn new(
        permission: Arc<dyn PermissionPort>,
        location: Arc<LocationProvider>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            permission,
            location,
            events,
            state: Mutex::new(GateState::NotDetermined),
        }
    }

    /// Current combined state
    pub fn state(&self) -> GateState {
        *self.state.lock()
    }

    /// Prompt for access if the platform has not decided yet
    ///
    /// A no-op when the platform already decided, when a prompt is
    /// outstanding, or once access was denied.
    #[instrument(skip(self))]
    pub async fn request_access(&self) -> Result<(), ApplicationError> {
        let status = self.permission.authorization_status();
        {
            let mut state = self.state.lock();
            if status != AuthorizationState::NotDetermined
                || matches!(*state, GateState::Requesting | GateState::Denied)
            {
                debug!(%status, state = %*state, "Access request skipped");
                return Ok(());
            }
            *state = GateState::Requesting;
        }

        info!("Prompting for location access");
        if let Err(e) = self.permission.request_authorization().await {
            warn!(error = %e, "Authorization prompt failed");
            self.transition(GateState::NotDetermined);
            return Err(e);
        }
        Ok(())
    }

    /// React to one platform authorization change
    #[instrument(skip(self))]
    pub async fn on_authorization_changed(
        &self,
        status: AuthorizationState,
    ) -> Result<(), ApplicationError> {
        if self.state().is_terminal() {
            debug!(%status, "Ignoring change after denial");
            return Ok(());
        }

        match status {
            AuthorizationState::NotDetermined => self.request_access().await,
            AuthorizationState::Restricted | AuthorizationState::Denied => {
                self.transition(GateState::Denied);
                warn!(%status, "Location access denied");
                self.events.publish(&CoreEvent::AccessDenied);
                Ok(())
            },
            AuthorizationState::AuthorizedAlways | AuthorizationState::AuthorizedWhenInUse => {
                self.transition(GateState::FixRequested);
                match self.location.request_one_fix().await {
                    Ok(_) => {
                        self.transition(GateState::FixObtained);
                        Ok(())
                    },
                    Err(e) => {
                        self.transition(GateState::Authorized);
                        Err(e)
                    },
                }
            },
        }
    }

    /// Consume authorization changes until the stream closes
    ///
    /// Failures are already reported through the bus or logged; the loop
    /// keeps running after them.
    pub async fn run(self: Arc<Self>, mut changes: mpsc::UnboundedReceiver<AuthorizationState>) {
        while let Some(status) = changes.recv().await {
            if let Err(e) = self.on_authorization_changed(status).await {
                debug!(%status, error = %e, "Authorization change handled with error");
            }
        }
        debug!("Authorization stream closed");
    }

    fn transition(&self, next: GateState) {
        let mut state = self.state.lock();
        if *state != next {
            debug!(from = %*state, to = %next, "Gate transition");
            *state = next;
        }
    }
}
