//! The tracking seam.
//!
//! The analytics collector is an external collaborator: the click binding
//! only depends on something that accepts a [`TrackedEvent`]. Hosts plug in
//! their integration through the [`Tracker`] trait; the crate ships an HTTP
//! implementation in [`crate::sender`] and an in-memory one here for tests
//! and local inspection.

use std::sync::Mutex;

use crate::types::TrackedEvent;

/// An analytics collector that records download events.
///
/// Implementations must be fire-and-forget: `track` is called on the click
/// path and must never block it or panic on delivery failure.
pub trait Tracker: Send + Sync {
    /// Records one event.
    fn track(&self, event: TrackedEvent);
}

/// In-memory tracker that stores every event it receives.
///
/// Used by the test suite and useful for hosts that batch events themselves.
#[derive(Debug, Default)]
pub struct MemoryTracker {
    events: Mutex<Vec<TrackedEvent>>,
}

impl MemoryTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event, in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<TrackedEvent> {
        self.lock().clone()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no events have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TrackedEvent>> {
        // A panicked writer cannot leave the Vec in a torn state, so a
        // poisoned lock is still safe to read.
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Tracker for MemoryTracker {
    fn track(&self, event: TrackedEvent) {
        self.lock().push(event);
    }
}
