//! Daemon configuration.
//!
//! Loaded from a TOML file whose path is the daemon's only argument;
//! every section and every field has a default, so an empty (or absent)
//! file yields the reference installation's settings.
//!
//! ```toml
//! [barrier]
//! closed_pulse = 1500
//! open_pulse = 850
//! hold_secs = 10
//!
//! [recognition]
//! enabled = true
//! secret_key = "sk_..."
//! confidence_threshold = 75.0
//!
//! [registry]
//! database_path = "plategate.db"
//!
//! [images]
//! directory = "review-images"
//! ```

use anyhow::Context;
use plategate_barrier::BarrierConfig;
use plategate_core::constants::{
    DEFAULT_CLOSED_PULSE, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_DRIVE_STEP,
    DEFAULT_HOLD_DURATION, DEFAULT_OPEN_PULSE, DEFAULT_RECOGNITION_TIMEOUT,
    DEFAULT_SETTLE_DELAY, DEFAULT_TICK_PERIOD,
};
use plategate_recognition::CloudAlprConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Top-level daemon configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    pub barrier: BarrierSection,
    pub recognition: RecognitionSection,
    pub registry: RegistrySection,
    pub images: ImagesSection,
}

impl DaemonConfig {
    /// Load configuration from the given file, or defaults when no
    /// path is supplied.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read config file {path}"))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse config file {path}"))
    }
}

/// Servo calibration and barrier timing.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BarrierSection {
    pub closed_pulse: u16,
    pub open_pulse: u16,
    pub drive_step: u16,
    pub tick_period_ms: u64,
    pub hold_secs: u64,
    pub settle_secs: u64,
}

impl Default for BarrierSection {
    fn default() -> Self {
        Self {
            closed_pulse: DEFAULT_CLOSED_PULSE,
            open_pulse: DEFAULT_OPEN_PULSE,
            drive_step: DEFAULT_DRIVE_STEP,
            tick_period_ms: DEFAULT_TICK_PERIOD.as_millis() as u64,
            hold_secs: DEFAULT_HOLD_DURATION.as_secs(),
            settle_secs: DEFAULT_SETTLE_DELAY.as_secs(),
        }
    }
}

impl BarrierSection {
    /// Convert to the barrier controller's configuration.
    pub fn to_barrier_config(&self) -> BarrierConfig {
        BarrierConfig {
            closed_pulse: self.closed_pulse,
            open_pulse: self.open_pulse,
            drive_step: self.drive_step,
            tick_period: Duration::from_millis(self.tick_period_ms),
            hold_duration: Duration::from_secs(self.hold_secs),
            settle_delay: Duration::from_secs(self.settle_secs),
        }
    }
}

/// Cloud recognition service settings.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecognitionSection {
    pub enabled: bool,
    pub endpoint: String,
    pub secret_key: String,
    pub country: String,
    pub recognize_vehicle: bool,
    pub timeout_secs: u64,
    pub confidence_threshold: f32,
}

impl Default for RecognitionSection {
    fn default() -> Self {
        let client = CloudAlprConfig::default();
        Self {
            enabled: client.enabled,
            endpoint: client.endpoint,
            secret_key: client.secret_key,
            country: client.country,
            recognize_vehicle: client.recognize_vehicle,
            timeout_secs: DEFAULT_RECOGNITION_TIMEOUT.as_secs(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl RecognitionSection {
    /// Convert to the cloud client's configuration.
    pub fn to_client_config(&self) -> CloudAlprConfig {
        CloudAlprConfig {
            enabled: self.enabled,
            endpoint: self.endpoint.clone(),
            secret_key: self.secret_key.clone(),
            country: self.country.clone(),
            recognize_vehicle: self.recognize_vehicle,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Registry database settings.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySection {
    pub database_path: String,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            database_path: "plategate.db".to_string(),
        }
    }
}

/// Review-image storage settings.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesSection {
    pub directory: String,
}

impl Default for ImagesSection {
    fn default() -> Self {
        Self {
            directory: "review-images".to_string(),
        }
    }
}
