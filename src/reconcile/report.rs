//! Reconciliation outcomes
//!
//! Expected failures are values, not errors, so every caller sees them in
//! the type and can roll its persisted state back.

use crate::backend::{Endpoint, ProbeResult, Unavailable};
use std::fmt;

/// What a successful reconciliation did to the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Dropin written for this endpoint
    Installed(Endpoint),
    /// Dropin deleted
    Removed,
    /// Already converged, nothing written
    Unchanged,
}

/// Why a reconciliation did not reach the desired state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// No port could be discovered; nothing was touched
    DiscoveryUnavailable(Unavailable),
    /// Endpoint did not pass the probe; any dropin was removed
    ProbeFailed {
        endpoint: Endpoint,
        probe: ProbeResult,
    },
    /// Writing the dropin failed
    InstallFailed { endpoint: Endpoint, reason: String },
    /// Deleting the dropin failed; it is still in place
    RemoveFailed { reason: String },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscoveryUnavailable(why) => write!(f, "Memcached unavailable: {}", why),
            Self::ProbeFailed { endpoint, probe } if !probe.reachable => {
                write!(f, "Memcached at {} is not reachable", endpoint)
            }
            Self::ProbeFailed { endpoint, .. } => {
                write!(f, "Memcached at {} did not return the test value", endpoint)
            }
            Self::InstallFailed { endpoint, reason } => {
                write!(f, "could not install dropin for {}: {}", endpoint, reason)
            }
            Self::RemoveFailed { reason } => write!(f, "could not remove dropin: {}", reason),
        }
    }
}

/// Result of one reconciliation against a desired state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub desired: bool,
    pub outcome: Result<Action, Failure>,
}

impl Report {
    pub fn success(desired: bool, action: Action) -> Self {
        Self {
            desired,
            outcome: Ok(action),
        }
    }

    pub fn failure(desired: bool, failure: Failure) -> Self {
        Self {
            desired,
            outcome: Err(failure),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Whether the dropin was written or deleted on the way to success
    pub fn wrote(&self) -> bool {
        matches!(self.outcome, Ok(Action::Installed(_)) | Ok(Action::Removed))
    }

    pub fn failure_reason(&self) -> Option<&Failure> {
        self.outcome.as_ref().err()
    }
}

/// Result of the startup drift check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    /// Desired state as persisted before the pass
    pub desired: bool,
    pub correction: Correction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    /// Dropin presence already matched the desired state
    None,
    /// Drift corrected
    Applied(Report),
    /// Correction failed and the desired state was degraded to `now`
    RolledBack { now: bool, reason: String },
}

impl StartupReport {
    /// Desired state after the pass
    pub fn desired_after(&self) -> bool {
        match &self.correction {
            Correction::RolledBack { now, .. } => *now,
            _ => self.desired,
        }
    }
}

/// Payload for a toggled admin parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResponse {
    pub option: &'static str,
    /// Final state, 0 or 1
    pub state: u8,
    /// User-visible reason the toggle was reverted
    pub error: Option<String>,
}
