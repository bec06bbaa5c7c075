use crate::{
    Result,
    constants::{MAX_PLATE_LENGTH, MIN_PLATE_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// License plate number (2-10 ASCII alphanumeric characters).
///
/// Plate strings are normalized on construction (trimmed, uppercased)
/// so that equality between a recognition guess and a registry entry
/// is plain exact comparison of normalized values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlateNumber(String);

impl PlateNumber {
    /// Create a new plate number with validation.
    ///
    /// The input is normalized (trimmed and converted to uppercase)
    /// before validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidPlate` if:
    /// - The length is not between 2-10 characters after trimming
    /// - The plate contains characters other than ASCII letters and digits
    pub fn new(plate: &str) -> Result<Self> {
        let plate = plate.trim().to_uppercase();

        let len = plate.len();
        if !(MIN_PLATE_LENGTH..=MAX_PLATE_LENGTH).contains(&len) {
            return Err(Error::InvalidPlate(format!(
                "Plate must be {MIN_PLATE_LENGTH}-{MAX_PLATE_LENGTH} chars, got {len}"
            )));
        }

        if !plate.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(Error::InvalidPlate(format!(
                "Plate must be ASCII alphanumeric, got '{plate}'"
            )));
        }

        Ok(PlateNumber(plate))
    }

    /// Get the normalized plate string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlateNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PlateNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PlateNumber::new(s)
    }
}

/// Recognition confidence score (0.0-100.0).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f32);

impl Confidence {
    /// Create a new confidence score with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfidence` if the value is outside
    /// `0.0..=100.0` or not finite.
    pub fn new(value: f32) -> Result<Self> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(Error::InvalidConfidence { value });
        }
        Ok(Confidence(value))
    }

    /// Get the raw score.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}
