//! Hardware device trait definitions.
//!
//! This module defines the trait interfaces between the barrier control
//! core and its physical collaborators. The contracts are deliberately
//! narrow: the core never sees GPIO pins, camera pipelines, or sensor
//! electrical details, only a pulse-width write, a still-image capture,
//! and a stream of motion edges.
//!
//! Traits with async methods use native `async fn` (Rust 1.90 + Edition
//! 2024 RPITIT), eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use bytes::Bytes;

/// Servo actuator abstraction.
///
/// A single operation: write a target pulse width. The write is
/// synchronous and infallible at this layer; the servo moves toward the
/// commanded position on its own, and the barrier controller shapes
/// motion by issuing a sequence of writes over time. A pulse width of 0
/// de-energizes the servo.
///
/// # Examples
///
/// ```
/// use plategate_hardware::traits::ActuatorDevice;
///
/// fn park<A: ActuatorDevice>(servo: &mut A, rest: u16) {
///     servo.drive(rest);
/// }
/// ```
pub trait ActuatorDevice: Send {
    /// Drive the servo with the given pulse width in microseconds.
    fn drive(&mut self, pulse: u16);
}

/// Still camera abstraction.
///
/// Produces one JPEG frame per capture request. Captures are on-demand
/// only; the camera is idle between recognition cycles.
pub trait CameraDevice: Send {
    /// Capture a single still image.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The camera hardware fails to produce a frame
    /// - The device is disconnected
    async fn capture_still(&mut self) -> Result<Bytes>;
}

/// A single edge event from the motion sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEdge {
    /// Sensor output went active: motion started.
    Rising,
    /// Sensor output went inactive: motion ended.
    Falling,
}

impl MotionEdge {
    /// Returns `true` for a rising (motion started) edge.
    #[must_use]
    pub fn is_rising(self) -> bool {
        matches!(self, MotionEdge::Rising)
    }
}

/// PIR motion sensor abstraction.
///
/// Push-based: `next_edge` blocks asynchronously until the sensor output
/// changes level. Debouncing, if any, is the driver's concern; the core
/// consumes raw edges and relies on its own in-flight guard to absorb
/// bursts.
pub trait MotionSensor: Send {
    /// Wait for the next edge from the sensor.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A read fault occurs (transient; the caller should keep reading)
    /// - The device is disconnected (terminal; see
    ///   [`HardwareError::is_disconnected`](crate::HardwareError::is_disconnected))
    async fn next_edge(&mut self) -> Result<MotionEdge>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_edge_is_rising() {
        assert!(MotionEdge::Rising.is_rising());
        assert!(!MotionEdge::Falling.is_rising());
    }
}
