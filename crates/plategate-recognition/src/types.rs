//! Recognition result types.

use plategate_core::{Confidence, PlateNumber};
use serde::{Deserialize, Serialize};

/// Vehicle attributes reported alongside a plate candidate.
///
/// All fields are best-effort: the recognition service may omit any of
/// them, and they carry no weight in the authorization decision. They
/// travel with a pending entry so a reviewer sees more than a bare
/// plate string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleAttributes {
    /// Dominant vehicle color (e.g. "silver").
    pub color: Option<String>,

    /// Vehicle make (e.g. "toyota").
    pub make: Option<String>,

    /// Vehicle make and model (e.g. "toyota_corolla").
    pub model: Option<String>,
}

impl VehicleAttributes {
    /// Returns `true` if no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.make.is_none() && self.model.is_none()
    }
}

/// One plate candidate from a recognition cycle.
///
/// Immutable and scoped to a single decision cycle; guesses are never
/// persisted as-is (an unknown plate is re-shaped into a pending entry
/// by the authorization engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateGuess {
    /// The recognized plate number, normalized.
    pub plate: PlateNumber,

    /// The service's confidence in this candidate.
    pub confidence: Confidence,

    /// Optional vehicle attributes shared by all candidates of one
    /// image.
    #[serde(default)]
    pub vehicle: VehicleAttributes,
}

impl PlateGuess {
    /// Build a guess from raw values, validating both fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the plate string or confidence
    /// value is out of range.
    pub fn new(plate: &str, confidence: f32) -> plategate_core::Result<Self> {
        Ok(Self {
            plate: PlateNumber::new(plate)?,
            confidence: Confidence::new(confidence)?,
            vehicle: VehicleAttributes::default(),
        })
    }

    /// Attach vehicle attributes to the guess.
    #[must_use]
    pub fn with_vehicle(mut self, vehicle: VehicleAttributes) -> Self {
        self.vehicle = vehicle;
        self
    }

    /// Returns `true` if the guess scores strictly above `threshold`.
    #[must_use]
    pub fn qualifies(&self, threshold: f32) -> bool {
        self.confidence.value() > threshold
    }
}
