//! Mock still camera for testing and development.
//!
//! The mock serves capture outcomes from a queue loaded through its
//! handle, so tests can script both frames and failures.

use crate::{
    HardwareError, Result,
    traits::CameraDevice,
};
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type OutcomeQueue = Arc<Mutex<VecDeque<Result<Bytes>>>>;

/// Mock still camera.
///
/// Each call to [`CameraDevice::capture_still`] pops the next scripted
/// outcome; an empty queue yields a capture error, which keeps tests
/// deterministic when a cycle fires more often than expected.
///
/// # Examples
///
/// ```
/// use plategate_hardware::mock::MockCamera;
/// use plategate_hardware::traits::CameraDevice;
///
/// #[tokio::main]
/// async fn main() {
///     let (mut camera, handle) = MockCamera::new();
///
///     handle.push_frame(b"jpeg-bytes".as_ref());
///     let frame = camera.capture_still().await.unwrap();
///     assert_eq!(&frame[..], b"jpeg-bytes");
///
///     // Nothing queued: the capture fails.
///     assert!(camera.capture_still().await.is_err());
/// }
/// ```
#[derive(Debug)]
pub struct MockCamera {
    outcomes: OutcomeQueue,
}

impl MockCamera {
    /// Create a new mock camera and its control handle.
    pub fn new() -> (Self, MockCameraHandle) {
        let outcomes: OutcomeQueue = Arc::new(Mutex::new(VecDeque::new()));
        let camera = Self {
            outcomes: Arc::clone(&outcomes),
        };
        (camera, MockCameraHandle { outcomes })
    }
}

impl CameraDevice for MockCamera {
    async fn capture_still(&mut self) -> Result<Bytes> {
        self.outcomes
            .lock()
            .expect("camera outcome lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(HardwareError::capture("no frame queued")))
    }
}

/// Handle for scripting a [`MockCamera`]'s capture outcomes.
#[derive(Debug, Clone)]
pub struct MockCameraHandle {
    outcomes: OutcomeQueue,
}

impl MockCameraHandle {
    /// Queue a successful capture returning the given frame bytes.
    pub fn push_frame(&self, frame: impl Into<Bytes>) {
        self.outcomes
            .lock()
            .expect("camera outcome lock poisoned")
            .push_back(Ok(frame.into()));
    }

    /// Queue a capture failure with the given message.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.outcomes
            .lock()
            .expect("camera outcome lock poisoned")
            .push_back(Err(HardwareError::capture(message)));
    }

    /// Number of scripted outcomes not yet consumed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.outcomes
            .lock()
            .expect("camera outcome lock poisoned")
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_camera_serves_frames_in_order() {
        let (mut camera, handle) = MockCamera::new();

        handle.push_frame(b"first".as_ref());
        handle.push_frame(b"second".as_ref());
        assert_eq!(handle.pending(), 2);

        assert_eq!(&camera.capture_still().await.unwrap()[..], b"first");
        assert_eq!(&camera.capture_still().await.unwrap()[..], b"second");
        assert_eq!(handle.pending(), 0);
    }

    #[tokio::test]
    async fn test_mock_camera_scripted_failure() {
        let (mut camera, handle) = MockCamera::new();

        handle.push_failure("shutter stuck");

        let error = camera.capture_still().await.unwrap_err();
        assert_eq!(error.to_string(), "Capture error: shutter stuck");
    }

    #[tokio::test]
    async fn test_mock_camera_empty_queue_fails() {
        let (mut camera, _handle) = MockCamera::new();
        assert!(camera.capture_still().await.is_err());
    }
}
