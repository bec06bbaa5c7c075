//! Plate recognition collaborator for the Plategate access controller.
//!
//! This crate defines the [`PlateRecognizer`] contract consumed by the
//! decision core, the [`PlateGuess`] results it produces, and two
//! implementations:
//!
//! - [`CloudAlprClient`]: posts a captured JPEG to an OpenALPR-compatible
//!   cloud endpoint and parses plate candidates plus vehicle attributes.
//! - [`mock::MockRecognizer`]: serves scripted outcomes for tests and the
//!   simulation daemon.
//!
//! Recognition is strictly per-image and stateless: one request in, zero
//! or more guesses out, no retry. A cycle that fails recognition simply
//! ends; the next motion event starts a fresh one.

pub mod client;
pub mod error;
pub mod mock;
pub mod types;

pub use client::{CloudAlprClient, CloudAlprConfig, PlateRecognizer};
pub use error::{RecognitionError, Result};
pub use types::{PlateGuess, VehicleAttributes};
