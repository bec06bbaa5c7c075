//! Barrier state machine and controller for the Plategate access
//! controller.
//!
//! This crate owns the physical barrier's lifecycle: the four-state
//! machine ({Closed, Opening, Open, Closing}), the periodic drive ticks
//! that step the servo between its calibrated bounds, the auto-close
//! hold timer, startup initialization, and the shutdown rest command.
//!
//! The controller runs as a spawned task and is commanded through a
//! clonable [`BarrierHandle`]; state transitions are published on a
//! watch channel so other components can observe (but never mutate)
//! barrier state.

pub mod controller;
pub mod state;

pub use controller::{BarrierConfig, BarrierController, BarrierError, BarrierHandle};
pub use state::BarrierState;
