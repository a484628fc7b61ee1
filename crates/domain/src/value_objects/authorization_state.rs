//! Device location authorization state

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// The platform's current decision on whether the app may access location
///
/// Owned by the platform location service. The core only observes
/// transitions between these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationState {
    /// The user has not been asked yet
    #[default]
    NotDetermined,
    /// Access is restricted by policy (parental controls, MDM)
    Restricted,
    /// The user explicitly denied access
    Denied,
    /// Access granted at all times
    AuthorizedAlways,
    /// Access granted while the app is in use
    AuthorizedWhenInUse,
}

impl AuthorizationState {
    /// Whether positioning requests are allowed in this state
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        matches!(self, Self::AuthorizedAlways | Self::AuthorizedWhenInUse)
    }

    /// Whether this state is a terminal refusal (no re-prompt possible)
    #[must_use]
    pub const fn is_denied(&self) -> bool {
        matches!(self, Self::Restricted | Self::Denied)
    }

    /// Stable string label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotDetermined => "not_determined",
            Self::Restricted => "restricted",
            Self::Denied => "denied",
            Self::AuthorizedAlways => "authorized_always",
            Self::AuthorizedWhenInUse => "authorized_when_in_use",
        }
    }
}

impl fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion from the raw status code reported by the platform
///
/// Codes follow the platform numbering: 0 not determined, 1 restricted,
/// 2 denied, 3 always, 4 when in use. Anything else is a logic error.
impl TryFrom<i32> for AuthorizationState {
    type Error = DomainError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NotDetermined),
            1 => Ok(Self::Restricted),
            2 => Ok(Self::Denied),
            3 => Ok(Self::AuthorizedAlways),
            4 => Ok(Self::AuthorizedWhenInUse),
            other => Err(DomainError::UnknownAuthorizationState(other)),
        }
    }
}
