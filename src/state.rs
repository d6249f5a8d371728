//! # Poller run state.
//!
//! ```text
//!   Initial ──start──► Running ──stop/abort──► Stopping ──(loop exits)──► Stopped
//!                         ▲                                                  │
//!                         └───────────────────────start──────────────────────┘
//! ```
//!
//! Only the engine writes the state; callers read it through
//! [`Poller::state`](crate::Poller::state) or subscribe to
//! [`Poller::state_store`](crate::Poller::state_store).

use std::fmt;

/// All the states a poller can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PollerState {
    /// Never started.
    #[default]
    Initial,
    /// The run loop is active (or about to begin its next cycle).
    Running,
    /// A stop was requested; the loop is winding down its current cycle.
    Stopping,
    /// The loop has exited.
    Stopped,
}

impl PollerState {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PollerState::Initial => "initial",
            PollerState::Running => "running",
            PollerState::Stopping => "stopping",
            PollerState::Stopped => "stopped",
        }
    }

    /// `true` for states in which no loop is alive and `start` launches a new one.
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, PollerState::Initial | PollerState::Stopped)
    }
}

impl fmt::Display for PollerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_initial() {
        assert_eq!(PollerState::default(), PollerState::Initial);
    }

    #[test]
    fn test_idle_states() {
        assert!(PollerState::Initial.is_idle());
        assert!(PollerState::Stopped.is_idle());
        assert!(!PollerState::Running.is_idle());
        assert!(!PollerState::Stopping.is_idle());
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(PollerState::Stopping.to_string(), "stopping");
    }
}
