//! Mock servo actuator for testing and development.
//!
//! The mock records every pulse-width command so tests can assert on the
//! exact drive sequence a barrier traversal produced.

use crate::traits::ActuatorDevice;
use std::sync::{Arc, Mutex};

/// Mock servo actuator.
///
/// Every call to [`ActuatorDevice::drive`] is appended to a shared
/// command history readable through the paired [`MockServoHandle`].
///
/// # Examples
///
/// ```
/// use plategate_hardware::mock::MockServo;
/// use plategate_hardware::traits::ActuatorDevice;
///
/// let (mut servo, handle) = MockServo::new();
///
/// servo.drive(1500);
/// servo.drive(1450);
/// servo.drive(0);
///
/// assert_eq!(handle.commands(), vec![1500, 1450, 0]);
/// assert_eq!(handle.last_command(), Some(0));
/// ```
#[derive(Debug)]
pub struct MockServo {
    history: Arc<Mutex<Vec<u16>>>,
}

impl MockServo {
    /// Create a new mock servo and its inspection handle.
    pub fn new() -> (Self, MockServoHandle) {
        let history = Arc::new(Mutex::new(Vec::new()));
        let servo = Self {
            history: Arc::clone(&history),
        };
        (servo, MockServoHandle { history })
    }
}

impl ActuatorDevice for MockServo {
    fn drive(&mut self, pulse: u16) {
        self.history
            .lock()
            .expect("servo history lock poisoned")
            .push(pulse);
    }
}

/// Handle for inspecting a [`MockServo`]'s command history.
#[derive(Debug, Clone)]
pub struct MockServoHandle {
    history: Arc<Mutex<Vec<u16>>>,
}

impl MockServoHandle {
    /// Get a copy of all pulse-width commands issued so far.
    #[must_use]
    pub fn commands(&self) -> Vec<u16> {
        self.history
            .lock()
            .expect("servo history lock poisoned")
            .clone()
    }

    /// Get the most recent pulse-width command, if any.
    #[must_use]
    pub fn last_command(&self) -> Option<u16> {
        self.history
            .lock()
            .expect("servo history lock poisoned")
            .last()
            .copied()
    }

    /// Number of commands issued so far.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.history
            .lock()
            .expect("servo history lock poisoned")
            .len()
    }

    /// Clear the recorded history.
    ///
    /// Useful for asserting on one phase of a cycle in isolation.
    pub fn clear(&self) {
        self.history
            .lock()
            .expect("servo history lock poisoned")
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_servo_records_commands() {
        let (mut servo, handle) = MockServo::new();

        servo.drive(1500);
        servo.drive(1450);
        servo.drive(1400);

        assert_eq!(handle.commands(), vec![1500, 1450, 1400]);
        assert_eq!(handle.last_command(), Some(1400));
        assert_eq!(handle.command_count(), 3);
    }

    #[test]
    fn test_mock_servo_empty_history() {
        let (_servo, handle) = MockServo::new();
        assert!(handle.commands().is_empty());
        assert_eq!(handle.last_command(), None);
    }

    #[test]
    fn test_mock_servo_handle_clear() {
        let (mut servo, handle) = MockServo::new();

        servo.drive(1500);
        handle.clear();
        servo.drive(0);

        assert_eq!(handle.commands(), vec![0]);
    }
}
