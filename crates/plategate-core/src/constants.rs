//! Default calibration and timing constants for the barrier controller
//! and the recognition pipeline.
//!
//! Everything here is a *default*: the servo pulse bounds vary per
//! installation and the timing values are tunable through the daemon
//! configuration. The defaults reproduce the reference installation
//! (SG-series servo on a residential gate, 100 ms drive ticks, 10 s
//! hold).

use std::time::Duration;

// ============================================================================
// Servo Calibration
// ============================================================================

/// Default pulse width for the fully closed position (microseconds).
///
/// # Value: 1500 µs (servo center)
pub const DEFAULT_CLOSED_PULSE: u16 = 1500;

/// Default pulse width for the fully open position (microseconds).
///
/// Note that the open bound may be on either side of the closed bound
/// depending on how the horn is mounted; the barrier controller steps
/// in whichever direction the calibration requires.
///
/// # Value: 850 µs
pub const DEFAULT_OPEN_PULSE: u16 = 850;

/// Pulse width that de-energizes the servo.
///
/// Written after every completed traversal, after initialization
/// settles, and on shutdown, so the motor never holds torque at rest.
pub const REST_PULSE: u16 = 0;

/// Lowest pulse width accepted by configuration validation (µs).
///
/// Standard hobby servos reject pulses below this; a misconfigured
/// bound would slam the barrier against its mechanical stop.
pub const MIN_CALIBRATED_PULSE: u16 = 500;

/// Highest pulse width accepted by configuration validation (µs).
pub const MAX_CALIBRATED_PULSE: u16 = 2500;

// ============================================================================
// Drive Timing
// ============================================================================

/// Default pulse-width change per drive tick (microseconds).
///
/// # Value: 50 µs
pub const DEFAULT_DRIVE_STEP: u16 = 50;

/// Default interval between drive ticks.
///
/// The tick period is wall-clock fixed regardless of load; traversal
/// time is therefore `ceil(span / step) × period`, not a configured
/// duration.
///
/// # Value: 100 ms
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

/// Default time the barrier stays open before auto-closing.
///
/// # Value: 10 s
pub const DEFAULT_HOLD_DURATION: Duration = Duration::from_secs(10);

/// Default settle delay between the initialization drive and the rest
/// command.
///
/// Gives the servo time to physically reach the closed position before
/// it is de-energized.
///
/// # Value: 3 s
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);

// ============================================================================
// Recognition
// ============================================================================

/// Default minimum confidence for a plate guess to qualify.
///
/// Guesses must score *strictly above* this value to participate in
/// the authorization decision.
///
/// # Value: 75.0
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 75.0;

/// Default timeout for one request to the recognition service.
///
/// There is no retry; a timed-out cycle ends and the next motion event
/// starts a fresh one.
///
/// # Value: 15 s
pub const DEFAULT_RECOGNITION_TIMEOUT: Duration = Duration::from_secs(15);

// ============================================================================
// Plate Format Constraints
// ============================================================================

/// Minimum plate number length (characters).
pub const MIN_PLATE_LENGTH: usize = 2;

/// Maximum plate number length (characters).
///
/// Covers every plate format the recognition service emits for the
/// supported countries.
pub const MAX_PLATE_LENGTH: usize = 10;
