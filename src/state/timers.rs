use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Request-scoped start timestamps
///
/// Each in-flight request is keyed by its engine-assigned ID, so concurrent
/// fetches never share a timer.
#[derive(Debug, Default)]
pub struct RequestTimers {
    started: Mutex<HashMap<u64, Instant>>,
}

impl RequestTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of a request
    pub fn start(&self, request_id: u64) {
        self.lock().insert(request_id, Instant::now());
    }

    /// Removes the timer for a request and returns the elapsed time
    ///
    /// Returns None when the request was never started, which happens for
    /// responses whose request hook did not run.
    pub fn finish(&self, request_id: u64) -> Option<Duration> {
        self.lock()
            .remove(&request_id)
            .map(|started| started.elapsed())
    }

    /// Drops the timer for a request that will never produce a response
    pub fn discard(&self, request_id: u64) {
        self.lock().remove(&request_id);
    }

    /// Number of requests currently being timed
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Instant>> {
        // A poisoned map only ever holds timestamps, which stay valid.
        self.started.lock().unwrap_or_else(|e| e.into_inner())
    }
}
