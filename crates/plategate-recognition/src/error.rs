//! Error types for plate recognition.

use thiserror::Error;

/// Result type alias for recognition operations.
pub type Result<T> = std::result::Result<T, RecognitionError>;

/// Errors that can occur while recognizing a plate from an image.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Recognition is switched off by configuration.
    ///
    /// The cloud client returns this by policy without touching the
    /// network, so an installation can run capture-only.
    #[error("Recognition is disabled by configuration")]
    Disabled,

    /// The request to the recognition service failed.
    #[error("Recognition transport error: {0}")]
    Transport(String),

    /// The service answered with an empty body.
    #[error("Recognition service returned an empty response")]
    EmptyResponse,

    /// The service answered with a body that does not parse.
    #[error("Invalid recognition payload: {0}")]
    InvalidPayload(String),
}

impl RecognitionError {
    /// Create a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new invalid-payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }

    /// Returns `true` if recognition is disabled by configuration.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_error() {
        let error = RecognitionError::Disabled;
        assert!(error.is_disabled());
        assert_eq!(error.to_string(), "Recognition is disabled by configuration");
    }

    #[test]
    fn test_transport_error() {
        let error = RecognitionError::transport("connection refused");
        assert!(!error.is_disabled());
        assert_eq!(
            error.to_string(),
            "Recognition transport error: connection refused"
        );
    }
}
