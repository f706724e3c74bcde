//! Scraper - main crawl orchestration logic
//!
//! The scraper wires the crawl engine to the page-processing pipeline:
//! - Deriving the allowed domains from the seed URL
//! - Timing each request and dispatching each response
//! - Following discovered links
//! - Waiting for fetches, then for page processing, to drain

use crate::config::{EngineConfig, ScraperConfig};
use crate::crawler::dispatcher::ResponseDispatcher;
use crate::crawler::log::ScrapeLog;
use crate::engine::{CrawlEngine, EngineError, HtmlElement};
use crate::output::{PageStats, StatsStore};
use crate::state::{CompletionTracker, RequestTimers};
use crate::url::prepare_allowed_domains;
use crate::ScopeError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Selector for the elements whose targets are followed
const LINK_SELECTOR: &str = "a[href]";

/// Crawls one website and accumulates per-page statistics
///
/// A scraper runs at most once. After `scrape` returns, `report` can be
/// called any number of times.
pub struct Scraper {
    config: ScraperConfig,
    engine_config: EngineConfig,
    store: StatsStore<PageStats>,
    processing: CompletionTracker,
    timers: Arc<RequestTimers>,
    started: AtomicBool,
    log: ScrapeLog,
}

impl Scraper {
    /// Creates a scraper with default engine settings
    pub fn new(config: ScraperConfig) -> Self {
        Self::with_engine_config(config, EngineConfig::default())
    }

    /// Creates a scraper with explicit engine settings
    pub fn with_engine_config(config: ScraperConfig, engine_config: EngineConfig) -> Self {
        let log = ScrapeLog::new(config.id, config.print_logs);
        Self {
            config,
            engine_config,
            store: StatsStore::new(),
            processing: CompletionTracker::new("processing"),
            timers: Arc::new(RequestTimers::new()),
            started: AtomicBool::new(false),
            log,
        }
    }

    pub fn id(&self) -> i32 {
        self.config.id
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Runs the crawl to completion
    ///
    /// Resolves once every fetch has finished and every fetched page has been
    /// recorded. Individual fetch and link failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// * `ScopeError::Config` - The website is not an absolute URL; nothing is fetched
    /// * `ScopeError::Engine` - The HTTP client could not be built
    /// * `ScopeError::AlreadyScraped` - This scraper has already run
    pub async fn scrape(&self) -> Result<(), ScopeError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ScopeError::AlreadyScraped { id: self.config.id });
        }

        let website = &self.config.website;
        self.log.info(format_args!("About to scrape {}", website));

        let allowed_domains = prepare_allowed_domains(website).map_err(|e| {
            self.log
                .warn(format_args!("Failed to prepare allowed domains: {}", e));
            e
        })?;

        let engine = self.build_engine(allowed_domains)?;

        if let Err(e) = engine.visit(website) {
            self.log.warn(format_args!("Error while visiting: {}", e));
        }

        self.log.info("Waiting for the scrape to finish...");
        engine.wait().await;

        self.log.info("Waiting for the page processing to finish...");
        self.processing.wait().await;

        self.log.info(format_args!(
            "Scrape finished: {} URLs visited, {} pages recorded",
            engine.visited_count(),
            self.store.len()
        ));

        Ok(())
    }

    /// Returns a snapshot of the statistics gathered so far
    ///
    /// The order of the returned pages is unspecified.
    pub fn report(&self) -> Vec<PageStats> {
        let stats = self.store.snapshot();
        self.log
            .info(format_args!("Reporting stats count {}", stats.len()));
        stats
    }

    /// Number of distinct pages recorded
    pub fn page_count(&self) -> usize {
        self.store.len()
    }

    fn build_engine(&self, allowed_domains: Vec<String>) -> Result<CrawlEngine, EngineError> {
        let log = self.log;

        let request_timers = Arc::clone(&self.timers);
        let error_timers = Arc::clone(&self.timers);
        let dispatcher = ResponseDispatcher::new(
            Arc::clone(&self.timers),
            self.processing.clone(),
            self.store.clone(),
            log,
        );

        let mut builder = CrawlEngine::builder()
            .max_depth(self.config.max_depth)
            .parallel(self.config.async_mode)
            .allowed_domains(allowed_domains)
            .engine_config(&self.engine_config)
            .on_request(move |request| request_timers.start(request.id()))
            .on_response(move |response| dispatcher.dispatch(response))
            .on_error(move |request, error| {
                error_timers.discard(request.id());
                log.warn(format_args!("Request to {} failed: {}", request.url(), error));
            });

        if self.config.recursively {
            builder = builder.on_html(LINK_SELECTOR, move |element| {
                follow_link(element, log);
            });
        }

        builder.build()
    }
}

/// What became of one followed link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkOutcome {
    /// Handed to the engine for fetching
    Queued,
    /// Seen before; logged at debug level only
    AlreadyVisited,
    /// Refused for any other reason; logged as a warning
    Refused,
}

/// Requests a visit to an anchor's target
///
/// Returns None when the element carries no `href`.
fn follow_link(element: &HtmlElement, log: ScrapeLog) -> Option<LinkOutcome> {
    let href = element.attr("href")?;

    log.debug(format_args!("Visiting: {}", href));
    let outcome = match element.visit(href) {
        Ok(()) => LinkOutcome::Queued,
        Err(e) if e.is_already_visited() => {
            log.debug(e);
            LinkOutcome::AlreadyVisited
        }
        Err(e) => {
            log.warn(format_args!("Error while linking: {}", e));
            LinkOutcome::Refused
        }
    };
    Some(outcome)
}
