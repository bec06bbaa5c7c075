//! Plate-authorization decision logic.

use plategate_barrier::BarrierHandle;
use plategate_recognition::PlateGuess;
use plategate_registry::{ImageStore, PendingPlate, Registry, RegistryResult};
use tracing::{info, warn};

/// Terminal verdict of one decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A guess matched an authorized plate; the barrier was asked to
    /// open.
    Matched,

    /// No guess matched. The canonical candidate was queued for review
    /// unless it was already pending.
    NoMatch,
}

/// Compares recognition guesses against the registry and acts on the
/// verdict.
///
/// On a match the engine fires a barrier open request and mutates
/// nothing. On a miss it registers the canonical candidate (the
/// recognizer's own top-ranked guess) as a pending entry, storing the
/// review image first so a pending row never exists without its photo.
pub struct AuthorizationEngine<G, S> {
    registry: G,
    images: S,
    barrier: BarrierHandle,
}

impl<G, S> AuthorizationEngine<G, S>
where
    G: Registry,
    S: ImageStore,
{
    /// Create a new engine over the given collaborators.
    pub fn new(registry: G, images: S, barrier: BarrierHandle) -> Self {
        Self {
            registry,
            images,
            barrier,
        }
    }

    /// Decide one cycle over the qualifying guesses and their source
    /// image.
    ///
    /// Matching is exact string equality of normalized plates, any
    /// guess against any authorized entry. The engine preserves the
    /// recognizer's ranking and never re-ranks.
    ///
    /// # Errors
    ///
    /// Returns a registry error if a snapshot read fails, or if storing
    /// the review image or appending the pending entry fails. A failed
    /// image store aborts the cycle before the pending append, so no
    /// entry is created without its image.
    pub async fn decide(
        &self,
        guesses: &[PlateGuess],
        image: &[u8],
    ) -> RegistryResult<Outcome> {
        let authorized = self.registry.authorized_plates().await?;

        let matched = guesses
            .iter()
            .find(|guess| authorized.iter().any(|entry| entry.plate == guess.plate.as_str()));
        if let Some(guess) = matched {
            info!(plate = %guess.plate, "plate match; opening barrier");
            if let Err(error) = self.barrier.request_open().await {
                warn!(%error, "barrier unavailable for matched plate");
            }
            return Ok(Outcome::Matched);
        }

        // The capture gate guarantees at least one guess; treat an
        // empty list as a no-op rather than panicking on a misuse.
        let Some(candidate) = guesses.first() else {
            return Ok(Outcome::NoMatch);
        };
        info!(plate = %candidate.plate, "no match; candidate for review queue");

        let pending = self.registry.pending_plates().await?;
        if pending.iter().any(|entry| entry.plate == candidate.plate.as_str()) {
            info!(plate = %candidate.plate, "already awaiting review; nothing to do");
            return Ok(Outcome::NoMatch);
        }

        // Image first: a pending entry must never exist without its
        // review photo.
        let key = candidate.plate.as_str();
        self.images.store(key, image).await?;

        let entry = PendingPlate::new(&candidate.plate, key).with_vehicle(
            candidate.vehicle.color.clone(),
            candidate.vehicle.make.clone(),
            candidate.vehicle.model.clone(),
        );
        match self.registry.append_pending(&entry).await {
            Ok(_) => {
                info!(plate = %candidate.plate, "unknown plate queued for review");
                Ok(Outcome::NoMatch)
            }
            // External tooling may have queued the plate between the
            // snapshot read and the insert.
            Err(error) if error.is_duplicate_pending() => {
                info!(plate = %candidate.plate, "already awaiting review; nothing to do");
                Ok(Outcome::NoMatch)
            }
            Err(error) => Err(error),
        }
    }
}
