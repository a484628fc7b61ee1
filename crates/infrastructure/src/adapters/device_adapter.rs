//! Simulated device - Implements PermissionPort and PositioningPort
//!
//! Stands in for platform location services. The authorization status starts
//! as `NotDetermined` and flips to the configured decision when the user is
//! prompted; each actual change is pushed onto the authorization stream.

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{PermissionPort, PositioningPort};
use async_trait::async_trait;
use domain::{AuthorizationState, Coordinate, LocationFix};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::config::DeviceConfig;
use crate::error::InfrastructureError;

/// Configuration-driven permission and positioning device
#[derive(Debug)]
pub struct SimulatedDevice {
    status: Mutex<AuthorizationState>,
    decision: AuthorizationState,
    location: Option<Coordinate>,
    positioning_delay: Duration,
    changes: mpsc::UnboundedSender<AuthorizationState>,
}

impl SimulatedDevice {
    /// Create the device and its authorization-change stream
    ///
    /// The stream starts with the initial `NotDetermined` status.
    pub fn new(
        config: &DeviceConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<AuthorizationState>), InfrastructureError> {
        config.validate().map_err(InfrastructureError::InvalidConfig)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let initial = AuthorizationState::NotDetermined;
        // The receiver is alive here, so the initial status is always queued
        let _ = tx.send(initial);

        let device = Self {
            status: Mutex::new(initial),
            decision: config.authorization,
            location: config.location.and_then(|l| l.to_coordinate()),
            positioning_delay: Duration::from_millis(config.positioning_delay_ms),
            changes: tx,
        };
        Ok((device, rx))
    }

    /// Change the status as the platform would, notifying the stream on change
    pub fn set_status(&self, next: AuthorizationState) {
        let mut status = self.status.lock();
        if *status == next {
            return;
        }
        debug!(from = %*status, to = %next, "Authorization status changed");
        *status = next;
        if self.changes.send(next).is_err() {
            debug!("Authorization stream closed; change not delivered");
        }
    }
}

#[async_trait]
impl PermissionPort for SimulatedDevice {
    fn authorization_status(&self) -> AuthorizationState {
        *self.status.lock()
    }

    #[instrument(skip(self))]
    async fn request_authorization(&self) -> Result<(), ApplicationError> {
        if self.authorization_status() != AuthorizationState::NotDetermined {
            return Ok(());
        }
        info!(decision = %self.decision, "Simulated user answered location prompt");
        self.set_status(self.decision);
        Ok(())
    }
}

#[async_trait]
impl PositioningPort for SimulatedDevice {
    #[instrument(skip(self))]
    async fn request_location(&self) -> Result<LocationFix, ApplicationError> {
        if !self.positioning_delay.is_zero() {
            tokio::time::sleep(self.positioning_delay).await;
        }
        let coordinate = self.location.ok_or_else(|| {
            ApplicationError::ExternalService("device has no location configured".to_string())
        })?;
        Ok(LocationFix::now(coordinate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeoLocationConfig;

    #[tokio::test]
    async fn stream_starts_not_determined() {
        let (device, mut rx) = SimulatedDevice::new(&DeviceConfig::for_testing()).unwrap();
        assert_eq!(rx.recv().await, Some(AuthorizationState::NotDetermined));
        assert_eq!(device.authorization_status(), AuthorizationState::NotDetermined);
    }

    #[tokio::test]
    async fn prompt_reveals_decision_once() {
        let config = DeviceConfig {
            authorization: AuthorizationState::Denied,
            ..DeviceConfig::for_testing()
        };
        let (device, mut rx) = SimulatedDevice::new(&config).unwrap();
        rx.recv().await;

        device.request_authorization().await.unwrap();
        device.request_authorization().await.unwrap();

        assert_eq!(device.authorization_status(), AuthorizationState::Denied);
        assert_eq!(rx.recv().await, Some(AuthorizationState::Denied));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn undecided_user_sends_no_change() {
        let config = DeviceConfig {
            authorization: AuthorizationState::NotDetermined,
            ..DeviceConfig::for_testing()
        };
        let (device, mut rx) = SimulatedDevice::new(&config).unwrap();
        rx.recv().await;

        device.request_authorization().await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn positioning_reports_configured_location() {
        let config = DeviceConfig {
            location: Some(GeoLocationConfig {
                latitude: 47.373_878,
                longitude: 8.545_094,
            }),
            ..DeviceConfig::default()
        };
        let (device, _rx) = SimulatedDevice::new(&config).unwrap();

        let fix = device.request_location().await.unwrap();
        assert!((fix.coordinate().latitude() - 47.373_878).abs() < 1e-9);
    }

    #[tokio::test]
    async fn positioning_without_location_fails() {
        let (device, _rx) = SimulatedDevice::new(&DeviceConfig::default()).unwrap();
        assert!(matches!(
            device.request_location().await,
            Err(ApplicationError::ExternalService(_))
        ));
    }

    #[tokio::test]
    async fn positioning_honors_delay() {
        let config = DeviceConfig {
            positioning_delay_ms: 50,
            ..DeviceConfig::for_testing()
        };
        let (device, _rx) = SimulatedDevice::new(&config).unwrap();

        let started = tokio::time::Instant::now();
        device.request_location().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = DeviceConfig {
            location: Some(GeoLocationConfig {
                latitude: -91.0,
                longitude: 0.0,
            }),
            ..DeviceConfig::default()
        };
        assert!(matches!(
            SimulatedDevice::new(&config),
            Err(InfrastructureError::InvalidConfig(_))
        ));
    }
}
