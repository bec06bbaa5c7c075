//! Error types for registry and image-store operations.

use thiserror::Error;

/// Specialized result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur in the registry and the image store.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Database connection or query execution failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Image store I/O failed.
    #[error("Image store error: {0}")]
    Io(#[from] std::io::Error),

    /// No pending entry exists for the given plate.
    #[error("No pending entry for plate {plate}")]
    NotFound { plate: String },

    /// A pending entry for the plate already exists.
    #[error("Pending entry for plate {plate} already exists")]
    DuplicatePending { plate: String },

    /// Configuration error (bad path, unreachable database file).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RegistryError {
    /// Create a not-found error for a plate.
    pub fn not_found(plate: impl Into<String>) -> Self {
        Self::NotFound {
            plate: plate.into(),
        }
    }

    /// Create a duplicate-pending error for a plate.
    pub fn duplicate_pending(plate: impl Into<String>) -> Self {
        Self::DuplicatePending {
            plate: plate.into(),
        }
    }

    /// Returns `true` if the error is a pending-queue uniqueness
    /// violation.
    #[must_use]
    pub fn is_duplicate_pending(&self) -> bool {
        matches!(self, Self::DuplicatePending { .. })
    }
}
