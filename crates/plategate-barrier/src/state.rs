//! Barrier state machine states and transition rules.
//!
//! # States
//!
//! - `Closed`: barrier at rest in the closed position
//! - `Opening`: drive ticks stepping toward the open position
//! - `Open`: barrier fully open, auto-close hold timer armed
//! - `Closing`: drive ticks stepping back toward the closed position
//!
//! # Valid Transitions
//!
//! The cycle is strictly circular:
//!
//! - Closed → Opening → Open → Closing → Closed
//!
//! An open request is only honored from `Closed` and a close request
//! only from `Open`; everything else is a rejected no-op surfaced as a
//! diagnostic by the controller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the barrier's position in its open/close cycle.
///
/// Owned exclusively by
/// [`BarrierController`](crate::controller::BarrierController); other
/// components observe it through the controller's watch channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierState {
    /// Barrier at rest in the closed position.
    Closed,

    /// Drive ticks in progress toward the open position.
    Opening,

    /// Barrier fully open; the auto-close hold timer is armed.
    Open,

    /// Drive ticks in progress toward the closed position.
    Closing,
}

impl fmt::Display for BarrierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            BarrierState::Closed => "Closed",
            BarrierState::Opening => "Opening",
            BarrierState::Open => "Open",
            BarrierState::Closing => "Closing",
        };
        write!(f, "{}", state_str)
    }
}

impl BarrierState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use plategate_barrier::BarrierState;
    ///
    /// assert!(BarrierState::Closed.can_transition_to(BarrierState::Opening));
    /// assert!(!BarrierState::Closed.can_transition_to(BarrierState::Open));
    /// ```
    #[must_use]
    pub fn can_transition_to(self, target: BarrierState) -> bool {
        matches!(
            (self, target),
            (BarrierState::Closed, BarrierState::Opening)
                | (BarrierState::Opening, BarrierState::Open)
                | (BarrierState::Open, BarrierState::Closing)
                | (BarrierState::Closing, BarrierState::Closed)
        )
    }

    /// Returns `true` if the barrier is moving (Opening or Closing).
    #[must_use]
    pub fn is_moving(self) -> bool {
        matches!(self, BarrierState::Opening | BarrierState::Closing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cycle_transitions() {
        assert!(BarrierState::Closed.can_transition_to(BarrierState::Opening));
        assert!(BarrierState::Opening.can_transition_to(BarrierState::Open));
        assert!(BarrierState::Open.can_transition_to(BarrierState::Closing));
        assert!(BarrierState::Closing.can_transition_to(BarrierState::Closed));
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        // No shortcuts through the cycle
        assert!(!BarrierState::Closed.can_transition_to(BarrierState::Open));
        assert!(!BarrierState::Closed.can_transition_to(BarrierState::Closing));
        assert!(!BarrierState::Opening.can_transition_to(BarrierState::Closing));
        assert!(!BarrierState::Opening.can_transition_to(BarrierState::Closed));
        assert!(!BarrierState::Open.can_transition_to(BarrierState::Opening));
        assert!(!BarrierState::Closing.can_transition_to(BarrierState::Open));

        // No reversing mid-traversal
        assert!(!BarrierState::Closing.can_transition_to(BarrierState::Opening));
        assert!(!BarrierState::Opening.can_transition_to(BarrierState::Opening));
    }

    #[test]
    fn test_is_moving() {
        assert!(BarrierState::Opening.is_moving());
        assert!(BarrierState::Closing.is_moving());
        assert!(!BarrierState::Closed.is_moving());
        assert!(!BarrierState::Open.is_moving());
    }

    #[test]
    fn test_state_display_formatting() {
        assert_eq!(BarrierState::Closed.to_string(), "Closed");
        assert_eq!(BarrierState::Opening.to_string(), "Opening");
        assert_eq!(BarrierState::Open.to_string(), "Open");
        assert_eq!(BarrierState::Closing.to_string(), "Closing");
    }

    #[test]
    fn test_state_serialization() {
        let state = BarrierState::Opening;
        let serialized = serde_json::to_string(&state).unwrap();
        assert_eq!(serialized, "\"opening\"");

        let deserialized: BarrierState = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, state);
    }
}
