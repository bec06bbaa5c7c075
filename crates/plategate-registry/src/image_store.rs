//! Review-image storage.
//!
//! Every pending entry is backed by a photo of the unrecognized vehicle
//! so a reviewer can decide whether to approve it. The store is keyed by
//! the plate string; writing the image must succeed *before* the pending
//! entry is appended, which is the ordering the authorization engine
//! enforces.

#![allow(async_fn_in_trait)]

use crate::error::RegistryResult;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Blob store for review images.
pub trait ImageStore: Send + Sync {
    /// Store an image under the given key, replacing any previous one.
    ///
    /// Re-storing under an existing key overwrites, so a cycle retried
    /// after a partial failure converges instead of erroring.
    async fn store(&self, key: &str, image: &[u8]) -> RegistryResult<()>;
}

/// Filesystem image store writing `<dir>/<key>.jpg`.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created on first write, not here, so building
    /// the store is infallible.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the given key resolves to.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.jpg"))
    }
}

impl ImageStore for FsImageStore {
    async fn store(&self, key: &str, image: &[u8]) -> RegistryResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        tokio::fs::write(&path, image).await?;
        debug!(key, path = %path.display(), bytes = image.len(), "review image stored");
        Ok(())
    }
}

/// In-memory image store for tests.
///
/// Paired with a handle that can inspect stored images and inject
/// failures, in the same style as the mock hardware devices.
#[derive(Debug)]
pub struct MemoryImageStore {
    images: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryImageStore {
    /// Create a new in-memory store and its inspection handle.
    pub fn new() -> (Self, MemoryImageStoreHandle) {
        let images = Arc::new(Mutex::new(HashMap::new()));
        let failing = Arc::new(AtomicBool::new(false));
        let store = Self {
            images: Arc::clone(&images),
            failing: Arc::clone(&failing),
        };
        (store, MemoryImageStoreHandle { images, failing })
    }
}

impl ImageStore for MemoryImageStore {
    async fn store(&self, key: &str, image: &[u8]) -> RegistryResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("simulated store failure").into());
        }
        self.images
            .lock()
            .expect("image store lock poisoned")
            .insert(key.to_string(), image.to_vec());
        Ok(())
    }
}

/// Handle for inspecting and controlling a [`MemoryImageStore`].
#[derive(Debug, Clone)]
pub struct MemoryImageStoreHandle {
    images: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryImageStoreHandle {
    /// Image stored under `key`, if any.
    #[must_use]
    pub fn stored(&self, key: &str) -> Option<Vec<u8>> {
        self.images
            .lock()
            .expect("image store lock poisoned")
            .get(key)
            .cloned()
    }

    /// Number of stored images.
    #[must_use]
    pub fn count(&self) -> usize {
        self.images.lock().expect("image store lock poisoned").len()
    }

    /// Make every subsequent store attempt fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}
