//! Mock PIR motion sensor for testing and development.
//!
//! The mock delivers edges pushed through its handle over a channel,
//! mirroring the push-based contract of a GPIO interrupt line.

use crate::{
    HardwareError, Result,
    traits::{MotionEdge, MotionSensor},
};
use tokio::sync::mpsc;

/// Event delivered to the mock sensor.
#[derive(Debug)]
enum SensorEvent {
    Edge(MotionEdge),
    Fault(String),
}

/// Mock PIR motion sensor.
///
/// # Examples
///
/// ```
/// use plategate_hardware::mock::MockMotionSensor;
/// use plategate_hardware::traits::{MotionEdge, MotionSensor};
///
/// #[tokio::main]
/// async fn main() {
///     let (mut sensor, handle) = MockMotionSensor::new();
///
///     handle.raise().await;
///     assert_eq!(sensor.next_edge().await.unwrap(), MotionEdge::Rising);
///
///     handle.fall().await;
///     assert_eq!(sensor.next_edge().await.unwrap(), MotionEdge::Falling);
/// }
/// ```
#[derive(Debug)]
pub struct MockMotionSensor {
    event_rx: mpsc::Receiver<SensorEvent>,
}

impl MockMotionSensor {
    /// Create a new mock motion sensor and its control handle.
    pub fn new() -> (Self, MockMotionSensorHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);
        (Self { event_rx }, MockMotionSensorHandle { event_tx })
    }
}

impl MotionSensor for MockMotionSensor {
    async fn next_edge(&mut self) -> Result<MotionEdge> {
        let event = self
            .event_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected("mock motion sensor"))?;

        match event {
            SensorEvent::Edge(edge) => Ok(edge),
            SensorEvent::Fault(message) => Err(HardwareError::sensor(message)),
        }
    }
}

/// Handle for driving a [`MockMotionSensor`].
///
/// Dropping every clone of the handle closes the channel, after which
/// the sensor reports itself disconnected.
#[derive(Debug, Clone)]
pub struct MockMotionSensorHandle {
    event_tx: mpsc::Sender<SensorEvent>,
}

impl MockMotionSensorHandle {
    /// Deliver a rising (motion started) edge.
    pub async fn raise(&self) {
        let _ = self.event_tx.send(SensorEvent::Edge(MotionEdge::Rising)).await;
    }

    /// Deliver a falling (motion ended) edge.
    pub async fn fall(&self) {
        let _ = self.event_tx.send(SensorEvent::Edge(MotionEdge::Falling)).await;
    }

    /// Deliver a transient read fault.
    pub async fn fault(&self, message: impl Into<String>) {
        let _ = self
            .event_tx
            .send(SensorEvent::Fault(message.into()))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sensor_delivers_edges_in_order() {
        let (mut sensor, handle) = MockMotionSensor::new();

        handle.raise().await;
        handle.fall().await;

        assert_eq!(sensor.next_edge().await.unwrap(), MotionEdge::Rising);
        assert_eq!(sensor.next_edge().await.unwrap(), MotionEdge::Falling);
    }

    #[tokio::test]
    async fn test_mock_sensor_fault_is_transient() {
        let (mut sensor, handle) = MockMotionSensor::new();

        handle.fault("glitch").await;
        handle.raise().await;

        let error = sensor.next_edge().await.unwrap_err();
        assert!(!error.is_disconnected());

        // The sensor keeps working after a fault.
        assert_eq!(sensor.next_edge().await.unwrap(), MotionEdge::Rising);
    }

    #[tokio::test]
    async fn test_mock_sensor_disconnect_on_handle_drop() {
        let (mut sensor, handle) = MockMotionSensor::new();
        drop(handle);

        let error = sensor.next_edge().await.unwrap_err();
        assert!(error.is_disconnected());
    }
}
