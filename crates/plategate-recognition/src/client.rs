//! Cloud ALPR recognition client.
//!
//! [`CloudAlprClient`] posts a captured JPEG, base64-encoded, to an
//! OpenALPR-compatible `recognize_bytes` endpoint and converts the
//! answer into [`PlateGuess`] values. The service ranks its own
//! candidates; the client preserves that order and never re-ranks.
//!
//! A configuration switch can disable recognition entirely, in which
//! case the client reports [`RecognitionError::Disabled`] without
//! touching the network.

#![allow(async_fn_in_trait)]

use crate::error::{RecognitionError, Result};
use crate::types::{PlateGuess, VehicleAttributes};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use plategate_core::constants::DEFAULT_RECOGNITION_TIMEOUT;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Plate recognition service abstraction.
///
/// One image in, zero or more ranked candidates out. Implementations
/// must be stateless across calls; the decision core treats every
/// recognition cycle as independent.
pub trait PlateRecognizer: Send + Sync {
    /// Recognize plate candidates in the given image.
    ///
    /// An image with no readable plate is a successful empty result,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Recognition is disabled by configuration
    /// - The service cannot be reached or answers a failure status
    /// - The service answers an empty or unparseable body
    async fn recognize(&self, image: &[u8]) -> Result<Vec<PlateGuess>>;
}

/// Configuration for the cloud ALPR client.
#[derive(Debug, Clone)]
pub struct CloudAlprConfig {
    /// Master switch. When `false` the client never sends a request.
    pub enabled: bool,

    /// Recognition endpoint URL.
    pub endpoint: String,

    /// API secret key, sent as a query parameter.
    pub secret_key: String,

    /// Country hint for plate formats (e.g. "us", "eu").
    pub country: String,

    /// Whether to request vehicle attributes (color, make, model).
    pub recognize_vehicle: bool,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CloudAlprConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.openalpr.com/v2/recognize_bytes".to_string(),
            secret_key: String::new(),
            country: "us".to_string(),
            recognize_vehicle: true,
            timeout: DEFAULT_RECOGNITION_TIMEOUT,
        }
    }
}

/// HTTP client for an OpenALPR-compatible recognition service.
pub struct CloudAlprClient {
    client: reqwest::Client,
    config: CloudAlprConfig,
}

impl CloudAlprClient {
    /// Build a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: CloudAlprConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecognitionError::transport(e.to_string()))?;

        Ok(Self { client, config })
    }
}

impl PlateRecognizer for CloudAlprClient {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<PlateGuess>> {
        if !self.config.enabled {
            return Err(RecognitionError::Disabled);
        }

        // The service expects the image as a JSON-encoded base64 string
        // in the request body.
        let encoded = STANDARD.encode(image);

        debug!(bytes = image.len(), "sending image for recognition");
        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[
                (
                    "recognize_vehicle",
                    if self.config.recognize_vehicle { "1" } else { "0" },
                ),
                ("country", self.config.country.as_str()),
                ("secret_key", self.config.secret_key.as_str()),
            ])
            .json(&encoded)
            .send()
            .await
            .map_err(|e| RecognitionError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::transport(format!(
                "service answered {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RecognitionError::transport(e.to_string()))?;
        if body.trim().is_empty() {
            return Err(RecognitionError::EmptyResponse);
        }

        let parsed: RecognizeResponse = serde_json::from_str(&body)
            .map_err(|e| RecognitionError::invalid_payload(e.to_string()))?;

        let guesses = convert_response(parsed);
        info!(candidates = guesses.len(), "recognition complete");
        Ok(guesses)
    }
}

/// Wire format of the `recognize_bytes` response, reduced to the fields
/// the decision core consumes.
#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<ImageResult>,
}

#[derive(Debug, Deserialize)]
struct ImageResult {
    #[serde(default)]
    candidates: Vec<Candidate>,
    vehicle: Option<VehicleSection>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    plate: String,
    confidence: f32,
}

/// Vehicle attribute rankings; only the top-ranked name of each list is
/// kept.
#[derive(Debug, Deserialize)]
struct VehicleSection {
    #[serde(default)]
    color: Vec<RankedName>,
    #[serde(default)]
    make: Vec<RankedName>,
    #[serde(default)]
    make_model: Vec<RankedName>,
}

#[derive(Debug, Deserialize)]
struct RankedName {
    name: String,
}

/// Convert the wire response into guesses, preserving the service's
/// candidate order.
///
/// The service analyzes one image per request, so only the first result
/// entry is meaningful; its vehicle attributes apply to every candidate
/// of that image. Candidates whose plate string fails domain validation
/// are skipped with a diagnostic.
fn convert_response(response: RecognizeResponse) -> Vec<PlateGuess> {
    let Some(result) = response.results.into_iter().next() else {
        return Vec::new();
    };

    let vehicle = result
        .vehicle
        .map(|section| VehicleAttributes {
            color: section.color.into_iter().next().map(|r| r.name),
            make: section.make.into_iter().next().map(|r| r.name),
            model: section.make_model.into_iter().next().map(|r| r.name),
        })
        .unwrap_or_default();

    result
        .candidates
        .into_iter()
        .filter_map(|candidate| {
            match PlateGuess::new(&candidate.plate, candidate.confidence) {
                Ok(guess) => Some(guess.with_vehicle(vehicle.clone())),
                Err(error) => {
                    debug!(plate = %candidate.plate, %error, "skipping malformed candidate");
                    None
                }
            }
        })
        .collect()
}
