//! Response dispatch: turns engine responses into page records for processing
//!
//! Dispatch runs on the engine's fetch task, so it never blocks: it narrows
//! the response, registers the processing task with the tracker and spawns it.

use crate::crawler::log::ScrapeLog;
use crate::crawler::processor::PageProcessor;
use crate::engine::Response;
use crate::output::{PageRecord, PageStats, StatsStore};
use crate::state::{CompletionTracker, RequestTimers};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// One fetched page, as handed to page processing
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    /// URL the page was served from
    pub url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Raw body bytes
    pub body: Vec<u8>,

    /// Link hops from the seed URL
    pub depth: u32,

    /// Time from request start to response; zero when the start was not recorded
    pub duration: Duration,

    /// Response headers, lowercase names, values in arrival order
    pub headers: BTreeMap<String, Vec<String>>,
}

impl PageResponse {
    /// Narrows an engine response into a page record
    pub fn from_response(response: &Response, duration: Duration) -> Self {
        let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        Self {
            url: response.url().to_string(),
            status_code: response.status().as_u16(),
            body: response.body().to_vec(),
            depth: response.request().depth(),
            duration,
            headers,
        }
    }

    /// First value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// Response hook body shared by every fetch task of one scrape
pub struct ResponseDispatcher<R: PageRecord = PageStats> {
    timers: Arc<RequestTimers>,
    processing: CompletionTracker,
    processor: PageProcessor<R>,
    log: ScrapeLog,
}

impl<R: PageRecord> ResponseDispatcher<R> {
    pub fn new(
        timers: Arc<RequestTimers>,
        processing: CompletionTracker,
        store: StatsStore<R>,
        log: ScrapeLog,
    ) -> Self {
        Self {
            timers,
            processing,
            processor: PageProcessor::new(store, log),
            log,
        }
    }

    /// Builds the page record and hands it to a new processing task
    ///
    /// The processing tracker is entered before the task is spawned, so a
    /// waiter can never see zero while this page is still pending.
    pub fn dispatch(&self, response: &Response) {
        self.log
            .info(format_args!("Received response from {}", response.url()));

        let duration = self
            .timers
            .finish(response.request().id())
            .unwrap_or_default();
        let page = PageResponse::from_response(response, duration);

        let guard = self.processing.enter();
        self.processor.clone().spawn(page, guard);
    }
}
