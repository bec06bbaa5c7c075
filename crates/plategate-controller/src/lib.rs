//! Access-decision core for the Plategate controller.
//!
//! This crate ties the collaborators together into the decision
//! pipeline: a motion edge starts a guarded capture cycle, the captured
//! image goes to plate recognition, qualifying guesses are checked
//! against the registry, and the verdict either opens the barrier or
//! queues the unknown plate for external review.
//!
//! # Components
//!
//! - [`CaptureFlag`]: the single-in-flight guard. At most one
//!   capture/recognize/decide cycle runs at any time; extra motion
//!   events are dropped, not queued.
//! - [`CaptureGate`]: orchestrates one cycle from motion event to
//!   terminal outcome, releasing the guard on every terminal path.
//! - [`AuthorizationEngine`]: the match / no-match decision and the
//!   image-then-queue registration of unknown plates.
//! - [`intake`]: the long-running loops feeding external events into
//!   the core (sensor edges, pending-removal approvals, barrier-closed
//!   guard release).
//!
//! The intake loops are plain `async fn`s rather than self-spawning
//! tasks; the binary (or a test) spawns them with concrete device
//! types.

pub mod authorize;
pub mod capture;
pub mod flag;
pub mod intake;

pub use authorize::{AuthorizationEngine, Outcome};
pub use capture::CaptureGate;
pub use flag::CaptureFlag;
