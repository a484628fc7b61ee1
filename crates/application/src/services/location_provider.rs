//! Location provider
//!
//! Obtains one fresh device fix per request and keeps the most recent one.
//! Successful fixes replace the stored value unconditionally and are announced
//! with [`CoreEvent::LocationUpdated`]; failures are announced with
//! [`CoreEvent::LocationFailed`] and leave the stored value untouched.

use std::sync::Arc;

use domain::LocationFix;
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::events::{CoreEvent, EventBus};
use crate::in_flight::InFlight;
use crate::ports::{PermissionPort, PositioningPort};

/// Wraps the one-shot positioning service
pub struct LocationProvider {
    positioning: Arc<dyn PositioningPort>,
    permission: Arc<dyn PermissionPort>,
    events: Arc<EventBus>,
    current: RwLock<Option<LocationFix>>,
    in_flight: InFlight,
}

impl std::fmt::Debug for LocationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationProvider")
            .field("current", &*self.current.read())
            .field("in_flight", &self.in_flight.is_busy())
            .finish_non_exhaustive()
    }
}

impl LocationProvider {
    /// Create a provider with no stored fix
    pub fn new(
        positioning: Arc<dyn PositioningPort>,
        permission: Arc<dyn PermissionPort>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            positioning,
            permission,
            events,
            current: RwLock::new(None),
            in_flight: InFlight::new("location"),
        }
    }

    /// Request a single fresh fix
    ///
    /// Must only be called after the platform reports an authorized state;
    /// earlier calls fail with [`ApplicationError::InvalidState`] and touch
    /// nothing. At most one request is outstanding at a time.
    #[instrument(skip(self))]
    pub async fn request_one_fix(&self) -> Result<LocationFix, ApplicationError> {
        let status = self.permission.authorization_status();
        if !status.is_authorized() {
            return Err(ApplicationError::InvalidState(format!(
                "location requested while authorization is {status}"
            )));
        }

        let _guard = self.in_flight.begin()?;
        debug!("Requesting one-shot fix");

        match self.positioning.request_location().await {
            Ok(fix) => {
                *self.current.write() = Some(fix);
                info!(coordinate = %fix.coordinate(), "Location updated");
                self.events.publish(&CoreEvent::LocationUpdated(fix));
                Ok(fix)
            },
            Err(e) => {
                let description = e.to_string();
                warn!(error = %description, "Positioning failed");
                self.events.publish(&CoreEvent::LocationFailed {
                    description: description.clone(),
                });
                Err(ApplicationError::LocationUnavailable(description))
            },
        }
    }

    /// The most recent fix, if any
    pub fn current_fix(&self) -> Option<LocationFix> {
        *self.current.read()
    }

    /// Whether a positioning request is outstanding
    pub fn is_requesting(&self) -> bool {
        self.in_flight.is_busy()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use domain::{AuthorizationState, Coordinate};

    use super::*;
    use crate::events::EventKind;
    use crate::ports::{MockPermissionPort, MockPositioningPort};

    fn authorized() -> MockPermissionPort {
        let mut permission = MockPermissionPort::new();
        permission
            .expect_authorization_status()
            .returning(|| AuthorizationState::AuthorizedWhenInUse);
        permission
    }

    fn fix(lat: f64, lon: f64) -> LocationFix {
        LocationFix::now(Coordinate::new(lat, lon).unwrap())
    }

    fn record(bus: &EventBus, kind: EventKind) -> Arc<Mutex<Vec<CoreEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(kind, move |e| sink.lock().unwrap().push(e.clone()));
        seen
    }

    #[tokio::test]
    async fn success_stores_fix_and_publishes_update() {
        let expected = fix(51.5, -0.12);
        let mut positioning = MockPositioningPort::new();
        positioning
            .expect_request_location()
            .times(1)
            .returning(move || Ok(expected));

        let bus = Arc::new(EventBus::new());
        let updates = record(&bus, EventKind::LocationUpdated);
        let provider = LocationProvider::new(
            Arc::new(positioning),
            Arc::new(authorized()),
            Arc::clone(&bus),
        );

        let got = provider.request_one_fix().await.unwrap();
        assert_eq!(got, expected);
        assert_eq!(provider.current_fix(), Some(expected));
        assert_eq!(*updates.lock().unwrap(), vec![CoreEvent::LocationUpdated(expected)]);
    }

    #[tokio::test]
    async fn failure_publishes_and_keeps_previous_fix() {
        let first = fix(48.86, 2.35);
        let mut calls = 0;
        let mut positioning = MockPositioningPort::new();
        positioning
            .expect_request_location()
            .times(2)
            .returning(move || {
                calls += 1;
                if calls == 1 {
                    Ok(first)
                } else {
                    Err(ApplicationError::ExternalService("no signal".into()))
                }
            });

        let bus = Arc::new(EventBus::new());
        let failures = record(&bus, EventKind::LocationFailed);
        let provider = LocationProvider::new(
            Arc::new(positioning),
            Arc::new(authorized()),
            Arc::clone(&bus),
        );

        provider.request_one_fix().await.unwrap();
        let err = provider.request_one_fix().await.unwrap_err();

        assert!(matches!(err, ApplicationError::LocationUnavailable(_)));
        assert_eq!(provider.current_fix(), Some(first));
        let failures = failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            &failures[0],
            CoreEvent::LocationFailed { description } if description.contains("no signal")
        ));
    }

    #[tokio::test]
    async fn request_before_authorization_is_rejected() {
        let mut permission = MockPermissionPort::new();
        permission
            .expect_authorization_status()
            .returning(|| AuthorizationState::NotDetermined);
        let mut positioning = MockPositioningPort::new();
        positioning.expect_request_location().never();

        let bus = Arc::new(EventBus::new());
        let failures = record(&bus, EventKind::LocationFailed);
        let provider =
            LocationProvider::new(Arc::new(positioning), Arc::new(permission), Arc::clone(&bus));

        let err = provider.request_one_fix().await.unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
        assert!(provider.current_fix().is_none());
        assert!(failures.lock().unwrap().is_empty());
    }

    #[test]
    fn current_fix_starts_empty() {
        let provider = LocationProvider::new(
            Arc::new(MockPositioningPort::new()),
            Arc::new(MockPermissionPort::new()),
            Arc::new(EventBus::new()),
        );
        assert!(provider.current_fix().is_none());
        assert!(!provider.is_requesting());
    }
}
