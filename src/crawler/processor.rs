//! Page processing: folds one page record into the shared stats store

use crate::crawler::dispatcher::PageResponse;
use crate::crawler::log::ScrapeLog;
use crate::output::{PageRecord, PageStats, StatsStore};
use crate::state::TrackerGuard;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tokio::task::JoinHandle;

/// Records pages into a stats store
pub struct PageProcessor<R: PageRecord = PageStats> {
    store: StatsStore<R>,
    log: ScrapeLog,
}

impl<R: PageRecord> Clone for PageProcessor<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            log: self.log,
        }
    }
}

impl<R: PageRecord> PageProcessor<R> {
    pub fn new(store: StatsStore<R>, log: ScrapeLog) -> Self {
        Self { store, log }
    }

    /// Upserts the page, logging instead of returning any failure
    ///
    /// Returns true if the page was recorded.
    pub fn process(&self, page: &PageResponse) -> bool {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.store.upsert(page)));

        match outcome {
            Ok(Ok(())) => {
                self.log.debug(format_args!("Recorded stats for {}", page.url));
                true
            }
            Ok(Err(e)) => {
                self.log
                    .warn(format_args!("Failed to record stats for {}: {}", page.url, e));
                false
            }
            Err(_) => {
                self.log
                    .warn(format_args!("Stats update panicked for {}", page.url));
                false
            }
        }
    }

    /// Processes the page on its own task
    ///
    /// The guard is held until processing has finished, on every path.
    pub fn spawn(self, page: PageResponse, guard: TrackerGuard) -> JoinHandle<()> {
        tokio::spawn(async move {
            let _guard = guard;
            self.process(&page);
        })
    }
}
