//! Single-in-flight capture guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Guard enforcing at most one in-flight recognition cycle.
///
/// Clones share the same underlying flag. The guard is acquired by
/// compare-and-swap when a capture is accepted and released on every
/// terminal path of the pipeline; after a plate match the release is
/// deferred to the barrier-closed watcher so a second capture cannot
/// race a still-open barrier.
#[derive(Debug, Clone, Default)]
pub struct CaptureFlag {
    held: Arc<AtomicBool>,
}

impl CaptureFlag {
    /// Create a new, unheld guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to begin a cycle.
    ///
    /// Returns `true` if the guard was free and is now held by the
    /// caller; `false` if a cycle is already in flight.
    #[must_use]
    pub fn try_begin(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Release the guard.
    ///
    /// Idempotent; returns `true` if the guard was actually held.
    pub fn release(&self) -> bool {
        self.held.swap(false, Ordering::SeqCst)
    }

    /// Returns `true` while a cycle is in flight.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_first_begin_succeeds() {
        let flag = CaptureFlag::new();

        assert!(flag.try_begin());
        for _ in 0..100 {
            assert!(!flag.try_begin());
        }
        assert!(flag.is_held());
    }

    #[test]
    fn test_release_is_idempotent() {
        let flag = CaptureFlag::new();

        assert!(flag.try_begin());
        assert!(flag.release());
        assert!(!flag.release());
        assert!(!flag.is_held());

        // Usable again after release.
        assert!(flag.try_begin());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = CaptureFlag::new();
        let watcher = flag.clone();

        assert!(flag.try_begin());
        assert!(watcher.is_held());

        assert!(watcher.release());
        assert!(!flag.is_held());
    }

    #[test]
    fn test_concurrent_begin_admits_exactly_one() {
        let flag = CaptureFlag::new();

        let winners: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let flag = flag.clone();
                    scope.spawn(move || usize::from(flag.try_begin()))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(winners, 1);
    }
}
