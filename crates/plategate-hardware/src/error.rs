//! Error types for hardware operations.
//!
//! This module defines error types specific to hardware device operations,
//! covering failure scenarios such as device disconnection, capture
//! failures, and sensor read faults.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Still-image capture failed.
    #[error("Capture error: {message}")]
    CaptureError { message: String },

    /// Motion sensor read fault.
    #[error("Sensor error: {message}")]
    SensorError { message: String },

    /// Device initialization failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new capture error.
    pub fn capture(message: impl Into<String>) -> Self {
        Self::CaptureError {
            message: message.into(),
        }
    }

    /// Create a new sensor error.
    pub fn sensor(message: impl Into<String>) -> Self {
        Self::SensorError {
            message: message.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Returns `true` if the error means the device is gone for good.
    ///
    /// Event intake uses this to distinguish a transient sensor fault
    /// (logged, reading continues) from a closed device (loop exits).
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}
