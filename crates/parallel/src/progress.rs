//! Shared progress counter

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Monotonic count of completed work items, shared between workers and an
/// observer.
///
/// Cloning yields another handle on the same counter. The counter is for
/// observation only; it never influences scheduling.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    completed: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl Progress {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the counter for a run of `total` items
    pub fn start(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    /// Record one completed item
    pub fn inc(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Items completed so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Items expected in the current run
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Whether every expected item has completed
    pub fn is_done(&self) -> bool {
        self.completed() >= self.total()
    }
}
