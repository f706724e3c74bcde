//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CompletionTracker`: Counts in-flight tasks of one kind and waits for them to drain
//! - `RequestTimers`: Tracks when each in-flight request started

mod timers;
mod tracker;

// Re-export main types
pub use timers::RequestTimers;
pub use tracker::{CompletionTracker, TrackerGuard};
