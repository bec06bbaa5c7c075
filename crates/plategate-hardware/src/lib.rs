//! Hardware device abstraction layer for the Plategate access controller.
//!
//! This crate provides trait-based abstractions for the three physical
//! collaborators of the barrier controller: the servo actuator that moves
//! the barrier, the still camera that photographs approaching vehicles,
//! and the PIR motion sensor that triggers capture cycles. The traits
//! enable substitution between mock implementations (for development and
//! testing) and real hardware drivers.
//!
//! # Design Philosophy
//!
//! - **Async where the hardware waits**: camera capture and sensor edges
//!   are asynchronous using native `async fn` in traits (Rust 1.90 +
//!   Edition 2024 RPITIT). The actuator drive is synchronous because a
//!   pulse-width write is a fire-and-forget register update with no
//!   completion to await.
//! - **Thread-safe**: all traits require `Send` for use with Tokio.
//! - **Error-aware**: fallible operations return `Result<T>` with
//!   detailed error information; the actuator drive is infallible at
//!   this layer (electrical faults are a driver concern).
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides simulated devices, each paired with a
//! programmatic handle:
//!
//! ```
//! use plategate_hardware::mock::MockServo;
//! use plategate_hardware::traits::ActuatorDevice;
//!
//! let (mut servo, handle) = MockServo::new();
//! servo.drive(1500);
//! servo.drive(0);
//! assert_eq!(handle.commands(), vec![1500, 0]);
//! ```

pub mod error;
pub mod mock;
pub mod traits;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{ActuatorDevice, CameraDevice, MotionEdge, MotionSensor};
