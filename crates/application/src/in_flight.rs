//! Single-outstanding-request guard

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ApplicationError;

/// Tracks whether a request of one kind is outstanding
#[derive(Debug)]
pub(crate) struct InFlight {
    label: &'static str,
    busy: AtomicBool,
}

impl InFlight {
    pub(crate) const fn new(label: &'static str) -> Self {
        Self {
            label,
            busy: AtomicBool::new(false),
        }
    }

    /// Claim the slot, failing fast if a request is already outstanding
    pub(crate) fn begin(&self) -> Result<InFlightGuard<'_>, ApplicationError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ApplicationError::RequestInFlight(self.label));
        }
        Ok(InFlightGuard { slot: self })
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the slot when dropped, including when the request future is dropped
#[derive(Debug)]
pub(crate) struct InFlightGuard<'a> {
    slot: &'a InFlight,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.slot.busy.store(false, Ordering::Release);
    }
}
