//! Plategate daemon.
//!
//! Wires the decision core to its collaborators and runs until
//! interrupted: mock hardware devices (driven by the simulation
//! console), the SQLite registry, the filesystem image store, and the
//! cloud recognition client. On shutdown the barrier controller
//! de-energizes the servo before the process exits.
//!
//! Usage: `plategate [config.toml]`. `RUST_LOG` controls log output.

mod config;
mod console;

use crate::config::DaemonConfig;
use plategate_barrier::BarrierController;
use plategate_controller::{AuthorizationEngine, CaptureGate, intake};
use plategate_hardware::mock::{MockCamera, MockMotionSensor, MockServo};
use plategate_recognition::CloudAlprClient;
use plategate_registry::{FsImageStore, Registry, SqliteRegistry};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plategate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting plategate v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1);
    let config = DaemonConfig::load(config_path.as_deref())?;

    let registry = SqliteRegistry::connect(&config.registry.database_path).await?;
    let images = FsImageStore::new(&config.images.directory);

    let (servo, _servo_handle) = MockServo::new();
    let (barrier, barrier_task) =
        BarrierController::spawn(servo, config.barrier.to_barrier_config())?;

    if !config.recognition.enabled {
        warn!("recognition is disabled; motion cycles will end without a decision");
    }
    let recognizer = CloudAlprClient::new(config.recognition.to_client_config())?;

    let (camera, camera_handle) = MockCamera::new();
    let (sensor, sensor_handle) = MockMotionSensor::new();

    let engine = AuthorizationEngine::new(registry.clone(), images, barrier.clone());
    let gate = CaptureGate::new(
        camera,
        recognizer,
        engine,
        config.recognition.confidence_threshold,
    );
    let guard = gate.guard();

    tokio::spawn(intake::motion_loop(sensor, gate));
    tokio::spawn(intake::removal_loop(
        registry.subscribe_removals(),
        barrier.clone(),
    ));
    tokio::spawn(intake::release_on_close(barrier.subscribe(), guard.clone()));

    let console = console::Console {
        camera: camera_handle,
        sensor: sensor_handle,
        registry: registry.clone(),
        barrier: barrier.clone(),
        guard,
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("interrupt received; shutting down");
        }
        result = console::run(console) => {
            result?;
            info!("console closed; shutting down");
        }
    }

    // De-energize the servo before exit.
    barrier.shutdown().await?;
    barrier_task.await?;
    registry.close().await;

    info!("plategate stopped");
    Ok(())
}
