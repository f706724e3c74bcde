//! Completion tracking for in-flight tasks
//!
//! A `CompletionTracker` counts tasks of one kind (fetches, page processing)
//! and lets a caller wait until that count drains to zero. The count is only
//! ever changed through `TrackerGuard`: entering the tracker increments it,
//! dropping the guard decrements it, so a task that panics still releases its
//! slot.

use std::sync::Arc;
use tokio::sync::watch;

/// Counts in-flight tasks and signals when none remain
#[derive(Debug, Clone)]
pub struct CompletionTracker {
    name: &'static str,
    count: Arc<watch::Sender<usize>>,
}

/// Marks one task as in flight for as long as it is alive
#[derive(Debug)]
#[must_use = "the task is counted as finished as soon as the guard is dropped"]
pub struct TrackerGuard {
    tracker: CompletionTracker,
}

impl CompletionTracker {
    /// Creates a tracker with no tasks in flight
    ///
    /// The name is only used in trace output.
    pub fn new(name: &'static str) -> Self {
        let (count, _) = watch::channel(0);
        Self {
            name,
            count: Arc::new(count),
        }
    }

    /// Registers a new in-flight task
    ///
    /// The increment is visible to `wait` before this returns, so a guard
    /// taken before spawning a task can never be missed by a waiter.
    pub fn enter(&self) -> TrackerGuard {
        self.count.send_modify(|n| *n += 1);
        tracing::trace!(tracker = self.name, "task entered");
        TrackerGuard {
            tracker: self.clone(),
        }
    }

    /// Waits until no task is in flight
    ///
    /// Returns immediately when nothing was ever entered.
    pub async fn wait(&self) {
        let mut rx = self.count.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    fn leave(&self) {
        self.count.send_modify(|n| *n = n.saturating_sub(1));
        tracing::trace!(tracker = self.name, "task left");
    }
}

impl Drop for TrackerGuard {
    fn drop(&mut self) {
        self.tracker.leave();
    }
}
