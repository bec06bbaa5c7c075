//! End-to-end pipeline tests wiring the decision core the way the
//! daemon does: mock devices, in-memory registry, spawned intake loops,
//! and a real barrier controller.
//!
//! These tests run on real time with a fast barrier calibration
//! (millisecond ticks) because the registry does its work on sqlx's own
//! worker threads, which paused time cannot fast-forward.

use plategate_barrier::{BarrierConfig, BarrierController, BarrierHandle, BarrierState};
use plategate_controller::{AuthorizationEngine, CaptureFlag, CaptureGate, intake};
use plategate_core::PlateNumber;
use plategate_hardware::mock::{
    MockCamera, MockCameraHandle, MockMotionSensor, MockMotionSensorHandle, MockServo,
    MockServoHandle,
};
use plategate_recognition::PlateGuess;
use plategate_recognition::mock::{MockRecognizer, MockRecognizerHandle};
use plategate_registry::{MemoryImageStore, MemoryImageStoreHandle, Registry, SqliteRegistry};
use tokio::sync::watch;
use tokio::time::{self, Duration};

/// Default calibration scaled down to milliseconds so a full
/// open/hold/close cycle finishes in well under a second.
fn fast_config() -> BarrierConfig {
    BarrierConfig {
        tick_period: Duration::from_millis(5),
        hold_duration: Duration::from_millis(200),
        settle_delay: Duration::from_millis(5),
        ..BarrierConfig::default()
    }
}

struct System {
    barrier: BarrierHandle,
    guard: CaptureFlag,
    registry: SqliteRegistry,
    camera: MockCameraHandle,
    recognizer: MockRecognizerHandle,
    sensor: MockMotionSensorHandle,
    servo: MockServoHandle,
    images: MemoryImageStoreHandle,
}

/// Wire the full pipeline and spawn the intake loops.
async fn start_system() -> System {
    let registry = SqliteRegistry::in_memory().await.unwrap();
    let (images, image_handle) = MemoryImageStore::new();

    let (servo, servo_handle) = MockServo::new();
    let (barrier, _barrier_task) = BarrierController::spawn(servo, fast_config()).unwrap();

    let (camera, camera_handle) = MockCamera::new();
    let (recognizer, recognizer_handle) = MockRecognizer::new();
    let (sensor, sensor_handle) = MockMotionSensor::new();

    let engine = AuthorizationEngine::new(registry.clone(), images, barrier.clone());
    let gate = CaptureGate::new(camera, recognizer, engine, 75.0);
    let guard = gate.guard();

    tokio::spawn(intake::motion_loop(sensor, gate));
    tokio::spawn(intake::removal_loop(
        registry.subscribe_removals(),
        barrier.clone(),
    ));
    tokio::spawn(intake::release_on_close(barrier.subscribe(), guard.clone()));

    // Let startup initialization finish before tests script events.
    time::sleep(Duration::from_millis(50)).await;
    servo_handle.clear();

    System {
        barrier,
        guard,
        registry,
        camera: camera_handle,
        recognizer: recognizer_handle,
        sensor: sensor_handle,
        servo: servo_handle,
        images: image_handle,
    }
}

async fn wait_for_state(rx: &mut watch::Receiver<BarrierState>, target: BarrierState) {
    time::timeout(Duration::from_secs(5), async {
        while *rx.borrow_and_update() != target {
            rx.changed().await.expect("barrier controller dropped");
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {target}"));
}

/// Give a scripted event time to flow through the pipeline.
async fn settle() {
    time::sleep(Duration::from_millis(100)).await;
}

fn guess(plate: &str, confidence: f32) -> PlateGuess {
    PlateGuess::new(plate, confidence).unwrap()
}

#[tokio::test]
async fn authorized_plate_runs_full_cycle_and_recovers() {
    let system = start_system().await;
    let plate = PlateNumber::new("ABC123").unwrap();
    system.registry.add_authorized(&plate, Some("alice")).await.unwrap();

    system.camera.push_frame(b"frame-1".as_ref());
    system.recognizer.push_guesses(vec![guess("ABC123", 90.0)]);

    let mut states = system.barrier.subscribe();
    system.sensor.raise().await;

    wait_for_state(&mut states, BarrierState::Open).await;
    assert!(system.guard.is_held(), "guard held while barrier is open");

    // Auto-close completes the cycle and frees the guard.
    wait_for_state(&mut states, BarrierState::Closed).await;
    settle().await;
    assert!(!system.guard.is_held());

    // The servo ends de-energized after the close.
    assert_eq!(system.servo.last_command(), Some(0));

    // A fresh cycle is possible now.
    system.camera.push_frame(b"frame-2".as_ref());
    system.recognizer.push_guesses(vec![]);
    system.sensor.raise().await;
    settle().await;
    assert_eq!(system.camera.pending(), 0, "second cycle captured an image");
    assert!(!system.guard.is_held());
}

#[tokio::test]
async fn motion_burst_issues_single_capture() {
    let system = start_system().await;
    let plate = PlateNumber::new("ABC123").unwrap();
    system.registry.add_authorized(&plate, None).await.unwrap();

    system.camera.push_frame(b"frame-1".as_ref());
    system.camera.push_frame(b"spare".as_ref());
    system.recognizer.push_guesses(vec![guess("ABC123", 90.0)]);

    let mut states = system.barrier.subscribe();
    system.sensor.raise().await;
    wait_for_state(&mut states, BarrierState::Open).await;

    // Burst of motion while the cycle is held open: all dropped.
    for _ in 0..5 {
        system.sensor.raise().await;
        system.sensor.fall().await;
    }
    settle().await;

    assert_eq!(system.camera.pending(), 1, "no second capture was issued");
    wait_for_state(&mut states, BarrierState::Closed).await;
}

#[tokio::test]
async fn unknown_plate_is_queued_once_and_approval_opens() {
    let system = start_system().await;

    // First sighting: image stored, pending entry created, guard
    // released without opening the barrier.
    system.camera.push_frame(b"frame-1".as_ref());
    system.recognizer.push_guesses(vec![guess("XYZ999", 82.0)]);
    system.sensor.raise().await;
    settle().await;

    assert!(!system.guard.is_held());
    assert_eq!(system.barrier.state(), BarrierState::Closed);
    assert_eq!(system.images.stored("XYZ999").unwrap(), b"frame-1");
    assert_eq!(system.registry.pending_plates().await.unwrap().len(), 1);

    // Second sighting before review: deduplicated.
    system.camera.push_frame(b"frame-2".as_ref());
    system.recognizer.push_guesses(vec![guess("XYZ999", 88.0)]);
    system.sensor.raise().await;
    settle().await;

    assert_eq!(system.registry.pending_plates().await.unwrap().len(), 1);

    // External approval: the removal opens the barrier with no
    // recognition involved.
    let mut states = system.barrier.subscribe();
    system.registry.remove_pending("XYZ999").await.unwrap();
    wait_for_state(&mut states, BarrierState::Open).await;
    wait_for_state(&mut states, BarrierState::Closed).await;
}

#[tokio::test]
async fn failed_cycle_does_not_wedge_the_gate() {
    let system = start_system().await;

    // Capture failure.
    system.camera.push_failure("shutter stuck");
    system.sensor.raise().await;
    settle().await;
    assert!(!system.guard.is_held());

    // Recognition failure on the next cycle.
    system.camera.push_frame(b"frame".as_ref());
    system
        .recognizer
        .push_error(plategate_recognition::RecognitionError::transport("timeout"));
    system.sensor.raise().await;
    settle().await;
    assert!(!system.guard.is_held());

    // The gate still works afterwards.
    system.camera.push_frame(b"frame".as_ref());
    system.recognizer.push_guesses(vec![guess("XYZ999", 80.0)]);
    system.sensor.raise().await;
    settle().await;
    assert_eq!(system.registry.pending_plates().await.unwrap().len(), 1);
}
