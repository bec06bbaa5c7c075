//! Interactive simulation console.
//!
//! The daemon ships with mock hardware, so the console is how an
//! operator exercises the system without a gate on the desk: it feeds
//! frames to the mock camera, pulses the mock PIR sensor, and edits the
//! registry. Output goes straight to stdout; tracing stays on stderr.

use anyhow::Result;
use plategate_barrier::BarrierHandle;
use plategate_controller::CaptureFlag;
use plategate_core::PlateNumber;
use plategate_hardware::mock::{MockCameraHandle, MockMotionSensorHandle};
use plategate_registry::{Registry, SqliteRegistry};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Frame served for a `motion` command without an image file.
const PLACEHOLDER_FRAME: &[u8] = b"plategate-simulated-frame";

/// Handles the console needs to drive the system.
pub struct Console {
    pub camera: MockCameraHandle,
    pub sensor: MockMotionSensorHandle,
    pub registry: SqliteRegistry,
    pub barrier: BarrierHandle,
    pub guard: CaptureFlag,
}

/// Run the console until `quit` or stdin EOF.
pub async fn run(console: Console) -> Result<()> {
    println!("plategate simulation console; type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        match parts.next() {
            None => {}
            Some("motion") => motion(&console, parts.next()).await,
            Some("authorize") => authorize(&console, parts.next(), parts.next()).await,
            Some("approve") => approve(&console, parts.next()).await,
            Some("plates") => plates(&console).await,
            Some("pending") => pending(&console).await,
            Some("status") => {
                println!(
                    "barrier: {}; capture in flight: {}",
                    console.barrier.state(),
                    console.guard.is_held()
                );
            }
            Some("help") => help(),
            Some("quit") | Some("exit") => break,
            Some(other) => println!("unknown command '{other}'; type 'help'"),
        }
    }

    Ok(())
}

async fn motion(console: &Console, image_path: Option<&str>) {
    let frame = match image_path {
        Some(path) => match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(error) => {
                println!("cannot read {path}: {error}");
                return;
            }
        },
        None => PLACEHOLDER_FRAME.to_vec(),
    };

    console.camera.push_frame(frame);
    console.sensor.raise().await;
    console.sensor.fall().await;
    println!("motion pulse delivered");
}

async fn authorize(console: &Console, plate: Option<&str>, owner: Option<&str>) {
    let Some(plate) = plate else {
        println!("usage: authorize <plate> [owner]");
        return;
    };
    let plate = match PlateNumber::new(plate) {
        Ok(plate) => plate,
        Err(error) => {
            println!("{error}");
            return;
        }
    };

    match console.registry.add_authorized(&plate, owner).await {
        Ok(_) => println!("{plate} enrolled as authorized"),
        Err(error) => println!("enrollment failed: {error}"),
    }
}

async fn approve(console: &Console, plate: Option<&str>) {
    let Some(plate) = plate else {
        println!("usage: approve <plate>");
        return;
    };
    let plate = match PlateNumber::new(plate) {
        Ok(plate) => plate,
        Err(error) => {
            println!("{error}");
            return;
        }
    };

    // The removal notification is what opens the barrier.
    match console.registry.remove_pending(plate.as_str()).await {
        Ok(()) => println!("{plate} approved; barrier opening"),
        Err(error) => println!("approval failed: {error}"),
    }
}

async fn plates(console: &Console) {
    match console.registry.authorized_plates().await {
        Ok(plates) if plates.is_empty() => println!("no authorized plates"),
        Ok(plates) => {
            for entry in plates {
                let owner = entry.owner.as_deref().unwrap_or("-");
                println!("{}  owner: {}", entry.plate, owner);
            }
        }
        Err(error) => println!("registry read failed: {error}"),
    }
}

async fn pending(console: &Console) {
    match console.registry.pending_plates().await {
        Ok(pending) if pending.is_empty() => println!("review queue is empty"),
        Ok(pending) => {
            for entry in pending {
                println!(
                    "{}  seen: {}  image: {}",
                    entry.plate, entry.created_at, entry.image_key
                );
            }
        }
        Err(error) => println!("registry read failed: {error}"),
    }
}

fn help() {
    println!("commands:");
    println!("  motion [image-file]        simulate a PIR pulse, optionally with a real frame");
    println!("  authorize <plate> [owner]  enroll a plate for automatic access");
    println!("  approve <plate>            approve a pending plate (opens the barrier)");
    println!("  plates                     list authorized plates");
    println!("  pending                    list the review queue");
    println!("  status                     barrier state and capture guard");
    println!("  quit                       shut down");
}
