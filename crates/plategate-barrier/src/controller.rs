//! Barrier controller actor.
//!
//! The controller owns the [`BarrierState`] machine, the servo pulse
//! width, and the actuator device. It runs as a spawned task that
//! processes open/close commands from a channel; a traversal in progress
//! always runs to completion before the next command is examined, so a
//! request can never interleave with a moving barrier — it is simply
//! rejected afterwards by the transition guards.
//!
//! # Motion model
//!
//! A traversal steps the pulse width by a fixed increment on a fixed
//! tick period until it reaches the target bound, clamping on the final
//! step. The tick interval is scoped to the traversal loop, so leaving
//! `Opening`/`Closing` cancels it by construction; there is no stored
//! timer handle to forget. Traversal time is therefore
//! `ceil(span / step) × tick_period` — a property of the calibration,
//! not a requested duration.
//!
//! After a completed opening the servo is de-energized and an auto-close
//! deadline is armed for the configured hold duration; the deadline is
//! consumed by the actor's select loop and disarmed whenever a close is
//! accepted.

use crate::state::BarrierState;
use plategate_core::constants::{
    DEFAULT_CLOSED_PULSE, DEFAULT_DRIVE_STEP, DEFAULT_HOLD_DURATION, DEFAULT_OPEN_PULSE,
    DEFAULT_SETTLE_DELAY, DEFAULT_TICK_PERIOD, MAX_CALIBRATED_PULSE, MIN_CALIBRATED_PULSE,
    REST_PULSE,
};
use plategate_hardware::ActuatorDevice;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Errors surfaced by the barrier controller and its handle.
#[derive(Debug, Error)]
pub enum BarrierError {
    /// The configuration failed validation at spawn time.
    #[error("Invalid barrier configuration: {0}")]
    InvalidConfig(String),

    /// The controller task has stopped; commands can no longer be
    /// delivered.
    #[error("Barrier controller is no longer running")]
    ControllerGone,
}

/// Calibration and timing for one barrier installation.
///
/// The pulse bounds come from physical calibration and may sit on
/// either side of each other; the controller steps in whichever
/// direction the target requires.
#[derive(Debug, Clone)]
pub struct BarrierConfig {
    /// Pulse width of the fully closed position (µs).
    pub closed_pulse: u16,

    /// Pulse width of the fully open position (µs).
    pub open_pulse: u16,

    /// Pulse-width change per drive tick (µs).
    pub drive_step: u16,

    /// Interval between drive ticks.
    pub tick_period: Duration,

    /// How long the barrier stays open before auto-closing.
    pub hold_duration: Duration,

    /// Settle delay between the initialization drive and the rest
    /// command.
    pub settle_delay: Duration,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            closed_pulse: DEFAULT_CLOSED_PULSE,
            open_pulse: DEFAULT_OPEN_PULSE,
            drive_step: DEFAULT_DRIVE_STEP,
            tick_period: DEFAULT_TICK_PERIOD,
            hold_duration: DEFAULT_HOLD_DURATION,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl BarrierConfig {
    /// Validate the calibration.
    ///
    /// # Errors
    ///
    /// Returns `BarrierError::InvalidConfig` if:
    /// - Either pulse bound is outside the servo's accepted range
    /// - The two bounds are equal (zero traversal)
    /// - The drive step is zero
    /// - The tick period is zero
    pub fn validate(&self) -> Result<(), BarrierError> {
        let range = MIN_CALIBRATED_PULSE..=MAX_CALIBRATED_PULSE;
        for (name, pulse) in [("closed_pulse", self.closed_pulse), ("open_pulse", self.open_pulse)] {
            if !range.contains(&pulse) {
                return Err(BarrierError::InvalidConfig(format!(
                    "{name} must be {MIN_CALIBRATED_PULSE}-{MAX_CALIBRATED_PULSE} µs, got {pulse}"
                )));
            }
        }
        if self.closed_pulse == self.open_pulse {
            return Err(BarrierError::InvalidConfig(
                "open and closed pulse bounds must differ".to_string(),
            ));
        }
        if self.drive_step == 0 {
            return Err(BarrierError::InvalidConfig(
                "drive_step must be non-zero".to_string(),
            ));
        }
        if self.tick_period.is_zero() {
            return Err(BarrierError::InvalidConfig(
                "tick_period must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of drive ticks a full traversal takes.
    #[must_use]
    pub fn traversal_ticks(&self) -> u32 {
        u32::from(
            self.closed_pulse
                .abs_diff(self.open_pulse)
                .div_ceil(self.drive_step),
        )
    }
}

/// Commands accepted by the controller task.
#[derive(Debug)]
enum BarrierCommand {
    Open,
    Close,
    Shutdown,
}

/// What woke the actor loop.
enum LoopEvent {
    Command(Option<BarrierCommand>),
    HoldExpired,
}

/// Clonable handle for commanding the barrier controller and observing
/// its state.
///
/// Requests are fire-and-forget: a request that the state machine
/// rejects (open while not Closed, close while not Open) is a silent
/// no-op surfaced only as a diagnostic log line.
#[derive(Debug, Clone)]
pub struct BarrierHandle {
    cmd_tx: mpsc::Sender<BarrierCommand>,
    state_rx: watch::Receiver<BarrierState>,
}

impl BarrierHandle {
    /// Request an open cycle.
    ///
    /// # Errors
    ///
    /// Returns `BarrierError::ControllerGone` if the controller task has
    /// stopped.
    pub async fn request_open(&self) -> Result<(), BarrierError> {
        self.cmd_tx
            .send(BarrierCommand::Open)
            .await
            .map_err(|_| BarrierError::ControllerGone)
    }

    /// Request a close cycle.
    ///
    /// # Errors
    ///
    /// Returns `BarrierError::ControllerGone` if the controller task has
    /// stopped.
    pub async fn request_close(&self) -> Result<(), BarrierError> {
        self.cmd_tx
            .send(BarrierCommand::Close)
            .await
            .map_err(|_| BarrierError::ControllerGone)
    }

    /// De-energize the servo and stop the controller task.
    ///
    /// # Errors
    ///
    /// Returns `BarrierError::ControllerGone` if the controller task has
    /// already stopped.
    pub async fn shutdown(&self) -> Result<(), BarrierError> {
        self.cmd_tx
            .send(BarrierCommand::Shutdown)
            .await
            .map_err(|_| BarrierError::ControllerGone)
    }

    /// Current barrier state.
    #[must_use]
    pub fn state(&self) -> BarrierState {
        *self.state_rx.borrow()
    }

    /// Subscribe to barrier state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BarrierState> {
        self.state_rx.clone()
    }
}

/// The barrier controller actor.
///
/// # Examples
///
/// ```no_run
/// use plategate_barrier::{BarrierConfig, BarrierController};
/// use plategate_hardware::mock::MockServo;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (servo, _servo_handle) = MockServo::new();
/// let (barrier, task) = BarrierController::spawn(servo, BarrierConfig::default())?;
///
/// barrier.request_open().await?;
/// // ... the barrier opens, holds, and auto-closes on its own ...
///
/// barrier.shutdown().await?;
/// task.await?;
/// # Ok(())
/// # }
/// ```
pub struct BarrierController<A> {
    state: BarrierState,
    pulse: u16,
    hold_deadline: Option<Instant>,
    config: BarrierConfig,
    actuator: A,
    state_tx: watch::Sender<BarrierState>,
    cmd_rx: mpsc::Receiver<BarrierCommand>,
}

impl<A> BarrierController<A>
where
    A: ActuatorDevice + 'static,
{
    /// Validate the configuration, spawn the controller task, and
    /// return its command handle.
    ///
    /// The task first runs the startup initialization (drive to the
    /// closed bound, settle, de-energize) and then serves commands
    /// until shutdown.
    ///
    /// # Errors
    ///
    /// Returns `BarrierError::InvalidConfig` if the calibration fails
    /// validation.
    pub fn spawn(
        actuator: A,
        config: BarrierConfig,
    ) -> Result<(BarrierHandle, JoinHandle<()>), BarrierError> {
        config.validate()?;

        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (state_tx, state_rx) = watch::channel(BarrierState::Closed);

        let controller = BarrierController {
            state: BarrierState::Closed,
            pulse: config.closed_pulse,
            hold_deadline: None,
            config,
            actuator,
            state_tx,
            cmd_rx,
        };

        let task = tokio::spawn(controller.run());
        Ok((BarrierHandle { cmd_tx, state_rx }, task))
    }

    async fn run(mut self) {
        self.initialize().await;

        loop {
            let event = match self.hold_deadline {
                Some(deadline) => tokio::select! {
                    cmd = self.cmd_rx.recv() => LoopEvent::Command(cmd),
                    _ = time::sleep_until(deadline) => LoopEvent::HoldExpired,
                },
                None => LoopEvent::Command(self.cmd_rx.recv().await),
            };

            match event {
                LoopEvent::HoldExpired => {
                    debug!("hold duration elapsed; auto-closing");
                    self.hold_deadline = None;
                    self.close_cycle().await;
                }
                LoopEvent::Command(Some(BarrierCommand::Open)) => self.open_cycle().await,
                LoopEvent::Command(Some(BarrierCommand::Close)) => self.close_cycle().await,
                LoopEvent::Command(Some(BarrierCommand::Shutdown)) | LoopEvent::Command(None) => {
                    break;
                }
            }
        }

        self.actuator.drive(REST_PULSE);
        info!("barrier controller stopped; servo de-energized");
    }

    /// Drive straight to the closed bound, let the servo settle, then
    /// de-energize. Runs once at startup, outside the open/close cycle.
    async fn initialize(&mut self) {
        info!(pulse = self.config.closed_pulse, "initializing barrier to closed position");
        self.pulse = self.config.closed_pulse;
        self.actuator.drive(self.pulse);
        time::sleep(self.config.settle_delay).await;
        self.actuator.drive(REST_PULSE);
    }

    async fn open_cycle(&mut self) {
        if !self.state.can_transition_to(BarrierState::Opening) {
            debug!(state = %self.state, "open request rejected");
            return;
        }

        info!("opening barrier");
        self.set_state(BarrierState::Opening);
        self.traverse(self.config.open_pulse).await;
        self.actuator.drive(REST_PULSE);
        self.set_state(BarrierState::Open);
        self.hold_deadline = Some(Instant::now() + self.config.hold_duration);
    }

    async fn close_cycle(&mut self) {
        if !self.state.can_transition_to(BarrierState::Closing) {
            debug!(state = %self.state, "close request rejected");
            return;
        }

        info!("closing barrier");
        self.hold_deadline = None;
        self.set_state(BarrierState::Closing);
        self.traverse(self.config.closed_pulse).await;
        self.actuator.drive(REST_PULSE);
        self.set_state(BarrierState::Closed);
    }

    /// Step the pulse width toward `target` on the tick period until it
    /// lands exactly on the bound.
    ///
    /// The interval lives only for the duration of this loop; returning
    /// from a traversal is what cancels the tick timer.
    async fn traverse(&mut self, target: u16) {
        let mut ticker = time::interval_at(
            Instant::now() + self.config.tick_period,
            self.config.tick_period,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.pulse = step_toward(self.pulse, target, self.config.drive_step);
            self.actuator.drive(self.pulse);
            if self.pulse == target {
                break;
            }
        }
    }

    fn set_state(&mut self, next: BarrierState) {
        debug_assert!(self.state.can_transition_to(next));
        debug!(from = %self.state, to = %next, "barrier state transition");
        self.state = next;
        self.state_tx.send_replace(next);
    }
}

/// Advance `current` toward `target` by at most `step`, clamping on the
/// final increment.
fn step_toward(current: u16, target: u16, step: u16) -> u16 {
    if current > target {
        current.saturating_sub(step).max(target)
    } else {
        current.saturating_add(step).min(target)
    }
}
