//! Event intake loops.
//!
//! Three long-running loops feed the decision core:
//!
//! - [`motion_loop`]: rising sensor edges start capture cycles; falling
//!   edges and transient faults are logged and ignored.
//! - [`removal_loop`]: a pending-entry removal is an external approval
//!   and opens the barrier directly, bypassing recognition.
//! - [`release_on_close`]: releases the capture guard whenever the
//!   barrier returns to `Closed`, completing the deferred release of a
//!   matched cycle.
//!
//! The loops are plain `async fn`s; the caller spawns them with
//! concrete device types and keeps the join handles. Each loop exits
//! when its event source closes.

use crate::capture::CaptureGate;
use crate::flag::CaptureFlag;
use plategate_barrier::{BarrierHandle, BarrierState};
use plategate_hardware::{CameraDevice, MotionEdge, MotionSensor};
use plategate_recognition::client::PlateRecognizer;
use plategate_registry::{ImageStore, Registry};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, trace, warn};

/// Forward motion edges from the sensor into the capture gate.
///
/// Sensor faults are non-fatal: the loop logs and keeps reading. Only a
/// disconnected sensor ends the loop.
pub async fn motion_loop<M, C, R, G, S>(mut sensor: M, mut gate: CaptureGate<C, R, G, S>)
where
    M: MotionSensor,
    C: CameraDevice,
    R: PlateRecognizer,
    G: Registry,
    S: ImageStore,
{
    loop {
        match sensor.next_edge().await {
            Ok(MotionEdge::Rising) => gate.on_motion_detected().await,
            Ok(MotionEdge::Falling) => trace!("motion ended"),
            Err(error) if error.is_disconnected() => {
                warn!(%error, "motion sensor gone; intake stopping");
                break;
            }
            Err(error) => warn!(%error, "motion sensor fault; continuing"),
        }
    }
}

/// Open the barrier on every pending-entry removal notification.
///
/// A removal means an external reviewer approved the vehicle, so the
/// barrier opens without a recognition cycle. The open request is
/// subject to the usual transition guards; a removal arriving while the
/// barrier is not closed is a logged no-op inside the controller.
pub async fn removal_loop(mut removals: broadcast::Receiver<String>, barrier: BarrierHandle) {
    loop {
        match removals.recv().await {
            Ok(plate) => {
                info!(plate, "pending entry approved; opening barrier");
                if barrier.request_open().await.is_err() {
                    warn!("barrier controller gone; removal intake stopping");
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "removal notifications lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Release the capture guard each time the barrier reaches `Closed`.
///
/// This is the deferred release of a matched cycle: the guard is held
/// from the accepted capture through the barrier's full open/hold/close
/// cycle. Releasing an unheld guard is a harmless no-op, so close
/// cycles with no capture in flight need no special casing.
pub async fn release_on_close(mut states: watch::Receiver<BarrierState>, flag: CaptureFlag) {
    while states.changed().await.is_ok() {
        if *states.borrow_and_update() == BarrierState::Closed && flag.release() {
            debug!("barrier closed; capture guard released");
        }
    }
}
