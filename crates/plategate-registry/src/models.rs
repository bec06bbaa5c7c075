//! Registry row models.

use chrono::{DateTime, Utc};
use plategate_core::PlateNumber;
use serde::{Deserialize, Serialize};

/// A plate pre-approved for automatic access.
///
/// Rows are created by an external enrollment process (the daemon's
/// console or review tooling); the decision core only ever reads them.
/// The stored plate string is normalized, so matching a recognition
/// guess against it is plain string equality.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthorizedPlate {
    /// Auto-increment primary key.
    pub id: i64,

    /// Normalized plate string (unique).
    pub plate: String,

    /// Free-form owner label for review tooling.
    pub owner: Option<String>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A detected-but-unauthorized plate awaiting external review.
///
/// Inserted by the authorization engine after the review image is
/// safely stored; removed by an external approval or rejection, which
/// the core observes as a removal notification.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PendingPlate {
    /// Auto-increment primary key.
    pub id: i64,

    /// Normalized plate string (unique within the queue).
    pub plate: String,

    /// Vehicle color reported by recognition, if any.
    pub color: Option<String>,

    /// Vehicle make reported by recognition, if any.
    pub make: Option<String>,

    /// Vehicle model reported by recognition, if any.
    pub model: Option<String>,

    /// Key of the review image in the image store.
    pub image_key: String,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl PendingPlate {
    /// Build a new entry for insertion.
    ///
    /// Taking a [`PlateNumber`] rather than a raw string keeps every
    /// stored plate normalized; `id` and `created_at` are assigned by
    /// the database on insert.
    #[must_use]
    pub fn new(plate: &PlateNumber, image_key: impl Into<String>) -> Self {
        Self {
            id: 0,
            plate: plate.as_str().to_string(),
            color: None,
            make: None,
            model: None,
            image_key: image_key.into(),
            created_at: Utc::now(),
        }
    }

    /// Set the vehicle attributes reported by recognition.
    #[must_use]
    pub fn with_vehicle(
        mut self,
        color: Option<String>,
        make: Option<String>,
        model: Option<String>,
    ) -> Self {
        self.color = color;
        self.make = make;
        self.model = model;
        self
    }
}
