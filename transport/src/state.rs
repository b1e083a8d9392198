//! Transport session states.

use std::fmt;

/// Where the transport is in its lifecycle.
///
/// ```text
/// Idle -> Starting -> Ready -> SessionRequested -> Active -> Success | Failed
/// ```
///
/// After a session ends the transport returns to its resting state: `Ready`
/// when initialised, `Idle` otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportState {
    Idle,
    Starting,
    Ready,
    SessionRequested,
    Active,
    Success,
    Failed,
}

impl TransportState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::SessionRequested => "session_requested",
            Self::Active => "active",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    /// Whether a tag session is being acquired or held.
    pub fn in_session(&self) -> bool {
        matches!(self, Self::SessionRequested | Self::Active)
    }

    /// Whether this is the outcome of a finished session.
    pub fn is_outcome(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
