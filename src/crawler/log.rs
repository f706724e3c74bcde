//! Per-scraper logging
//!
//! Scraper log lines go through `tracing` tagged with the scraper's ID, and
//! are dropped when the scraper was configured with `print-logs = false`.

use std::fmt::Display;

/// Log sink for one scraper
///
/// Every line carries the scraper's ID and nothing is emitted unless logging
/// was switched on for that scraper.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeLog {
    id: i32,
    enabled: bool,
}

impl ScrapeLog {
    pub fn new(id: i32, enabled: bool) -> Self {
        Self { id, enabled }
    }

    pub fn info(&self, message: impl Display) {
        if self.enabled {
            tracing::info!(scraper = self.id, "{}", message);
        }
    }

    pub fn warn(&self, message: impl Display) {
        if self.enabled {
            tracing::warn!(scraper = self.id, "{}", message);
        }
    }

    pub fn debug(&self, message: impl Display) {
        if self.enabled {
            tracing::debug!(scraper = self.id, "{}", message);
        }
    }
}
