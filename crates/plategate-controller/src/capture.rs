//! Guarded capture/recognize/decide orchestration.

use crate::authorize::{AuthorizationEngine, Outcome};
use crate::flag::CaptureFlag;
use plategate_hardware::CameraDevice;
use plategate_recognition::client::PlateRecognizer;
use plategate_recognition::PlateGuess;
use plategate_registry::{ImageStore, Registry};
use tracing::{debug, info, warn};

/// Runs one recognition cycle per accepted motion event.
///
/// The gate owns the camera and the in-flight guard. A motion event
/// arriving while a cycle is active is dropped silently; there is no
/// queueing. Every terminal path of a cycle releases the guard, with
/// one exception: a plate match keeps it held until the barrier has
/// completed its close cycle (released by
/// [`intake::release_on_close`](crate::intake::release_on_close)), so a
/// new capture cannot start while the barrier is still open.
pub struct CaptureGate<C, R, G, S> {
    flag: CaptureFlag,
    camera: C,
    recognizer: R,
    engine: AuthorizationEngine<G, S>,
    confidence_threshold: f32,
}

impl<C, R, G, S> CaptureGate<C, R, G, S>
where
    C: CameraDevice,
    R: PlateRecognizer,
    G: Registry,
    S: ImageStore,
{
    /// Create a new gate.
    ///
    /// `confidence_threshold` is the strictly-greater-than bound a
    /// guess must exceed to participate in the decision.
    pub fn new(
        camera: C,
        recognizer: R,
        engine: AuthorizationEngine<G, S>,
        confidence_threshold: f32,
    ) -> Self {
        Self {
            flag: CaptureFlag::new(),
            camera,
            recognizer,
            engine,
            confidence_threshold,
        }
    }

    /// Clone of the in-flight guard, for the barrier-closed watcher.
    #[must_use]
    pub fn guard(&self) -> CaptureFlag {
        self.flag.clone()
    }

    /// Handle one motion event.
    ///
    /// Never fails upward: every failure is logged, terminates the
    /// cycle, and releases the guard so the next motion event starts
    /// fresh.
    pub async fn on_motion_detected(&mut self) {
        if !self.flag.try_begin() {
            debug!("capture already in flight; motion event dropped");
            return;
        }

        info!("motion detected; capturing image");
        let image = match self.camera.capture_still().await {
            Ok(image) => image,
            Err(error) => {
                warn!(%error, "image capture failed; cycle abandoned");
                self.flag.release();
                return;
            }
        };

        let guesses = match self.recognizer.recognize(&image).await {
            Ok(guesses) => guesses,
            Err(error) if error.is_disabled() => {
                info!("recognition disabled; cycle abandoned");
                self.flag.release();
                return;
            }
            Err(error) => {
                warn!(%error, "recognition failed; cycle abandoned");
                self.flag.release();
                return;
            }
        };

        let qualifying: Vec<PlateGuess> = guesses
            .into_iter()
            .filter(|guess| guess.qualifies(self.confidence_threshold))
            .collect();
        if qualifying.is_empty() {
            info!("no vehicle detected");
            self.flag.release();
            return;
        }

        debug!(candidates = qualifying.len(), "deciding on qualifying guesses");
        match self.engine.decide(&qualifying, &image).await {
            // Guard stays held until the barrier closes again.
            Ok(Outcome::Matched) => {}
            Ok(Outcome::NoMatch) => {
                self.flag.release();
            }
            Err(error) => {
                warn!(%error, "authorization decision failed; cycle abandoned");
                self.flag.release();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plategate_barrier::{BarrierConfig, BarrierController, BarrierHandle, BarrierState};
    use plategate_core::PlateNumber;
    use plategate_hardware::mock::{MockCamera, MockCameraHandle, MockServo};
    use plategate_recognition::RecognitionError;
    use plategate_recognition::mock::{MockRecognizer, MockRecognizerHandle};
    use plategate_registry::{
        MemoryImageStore, MemoryImageStoreHandle, Registry, SqliteRegistry,
    };

    struct Fixture {
        gate: CaptureGate<MockCamera, MockRecognizer, SqliteRegistry, MemoryImageStore>,
        camera: MockCameraHandle,
        recognizer: MockRecognizerHandle,
        registry: SqliteRegistry,
        images: MemoryImageStoreHandle,
        barrier: BarrierHandle,
    }

    async fn fixture() -> Fixture {
        // SQLite pool setup establishes a connection on a blocking thread; under
        // `start_paused` tokio would auto-advance the virtual clock past the pool
        // acquire timeout before that connection lands. Let real time flow for the
        // setup, then re-pause so the barrier-timing assertions stay deterministic.
        tokio::time::resume();
        let registry = SqliteRegistry::in_memory().await.unwrap();
        tokio::time::pause();
        let (images, image_handle) = MemoryImageStore::new();
        let (servo, _servo_handle) = MockServo::new();
        let (barrier, _task) =
            BarrierController::spawn(servo, BarrierConfig::default()).unwrap();

        let (camera, camera_handle) = MockCamera::new();
        let (recognizer, recognizer_handle) = MockRecognizer::new();

        let engine = AuthorizationEngine::new(registry.clone(), images, barrier.clone());
        Fixture {
            gate: CaptureGate::new(camera, recognizer, engine, 75.0),
            camera: camera_handle,
            recognizer: recognizer_handle,
            registry,
            images: image_handle,
            barrier,
        }
    }

    fn guess(plate: &str, confidence: f32) -> PlateGuess {
        PlateGuess::new(plate, confidence).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_failure_releases_guard() {
        let mut fx = fixture().await;
        fx.camera.push_failure("shutter stuck");

        fx.gate.on_motion_detected().await;

        assert!(!fx.gate.guard().is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recognition_disabled_releases_guard() {
        let mut fx = fixture().await;
        fx.camera.push_frame(b"jpeg".as_ref());
        fx.recognizer.push_error(RecognitionError::Disabled);

        fx.gate.on_motion_detected().await;

        assert!(!fx.gate.guard().is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recognition_failure_releases_guard() {
        let mut fx = fixture().await;
        fx.camera.push_frame(b"jpeg".as_ref());
        fx.recognizer.push_error(RecognitionError::transport("timeout"));

        fx.gate.on_motion_detected().await;

        assert!(!fx.gate.guard().is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_qualifying_guess_releases_guard() {
        let mut fx = fixture().await;
        fx.camera.push_frame(b"jpeg".as_ref());
        // 75.0 does not qualify against a 75.0 threshold.
        fx.recognizer
            .push_guesses(vec![guess("ABC123", 75.0), guess("XYZ999", 40.0)]);

        fx.gate.on_motion_detected().await;

        assert!(!fx.gate.guard().is_held());
        assert!(fx.registry.pending_plates().await.unwrap().is_empty());
        assert_eq!(fx.images.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_match_queues_and_releases_guard() {
        let mut fx = fixture().await;
        fx.camera.push_frame(b"jpeg".as_ref());
        fx.recognizer.push_guesses(vec![guess("XYZ999", 80.0)]);

        fx.gate.on_motion_detected().await;

        assert!(!fx.gate.guard().is_held());
        assert_eq!(fx.registry.pending_plates().await.unwrap().len(), 1);
        assert!(fx.images.stored("XYZ999").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_holds_guard_and_drops_motion() {
        let mut fx = fixture().await;
        let plate = PlateNumber::new("ABC123").unwrap();
        fx.registry.add_authorized(&plate, None).await.unwrap();

        fx.camera.push_frame(b"jpeg".as_ref());
        fx.camera.push_frame(b"second".as_ref());
        fx.recognizer.push_guesses(vec![guess("ABC123", 90.0)]);

        fx.gate.on_motion_detected().await;
        assert!(fx.gate.guard().is_held());

        // Motion while the cycle is still held: dropped without
        // touching the camera.
        fx.gate.on_motion_detected().await;
        assert_eq!(fx.camera.pending(), 1);

        let mut states = fx.barrier.subscribe();
        while *states.borrow_and_update() != BarrierState::Open {
            states.changed().await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_decision_failure_releases_guard() {
        let mut fx = fixture().await;
        fx.camera.push_frame(b"jpeg".as_ref());
        fx.recognizer.push_guesses(vec![guess("XYZ999", 80.0)]);
        fx.images.set_failing(true);

        fx.gate.on_motion_detected().await;

        assert!(!fx.gate.guard().is_held());
        assert!(fx.registry.pending_plates().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_confidence_filter_precedes_decision() {
        let mut fx = fixture().await;
        let plate = PlateNumber::new("ABC123").unwrap();
        fx.registry.add_authorized(&plate, None).await.unwrap();

        // The only matching guess is below threshold, so the cycle ends
        // as "no vehicle" rather than a match.
        fx.camera.push_frame(b"jpeg".as_ref());
        fx.recognizer.push_guesses(vec![guess("ABC123", 60.0)]);

        fx.gate.on_motion_detected().await;

        assert!(!fx.gate.guard().is_held());
        assert_eq!(fx.barrier.state(), BarrierState::Closed);
    }
}
