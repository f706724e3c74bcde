//! Crawl engine: fetch scheduling, hooks and link traversal
//!
//! The engine owns everything below the page level:
//! - Depth, scheme, domain and already-visited checks for every visit
//! - Fetch tasks, limited by a semaphore (one at a time unless parallel)
//! - Request, response, HTML element and error hooks
//! - A completion tracker that `wait` drains
//!
//! Hooks are plain closures registered on the builder. They run on the fetch
//! task and must return quickly; anything expensive belongs on a task of its
//! own.
//!
//! # Example
//!
//! ```no_run
//! use sitescope::engine::CrawlEngine;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = CrawlEngine::builder()
//!     .max_depth(2)
//!     .allowed_domains(vec!["example.com".to_string()])
//!     .on_response(|response| println!("{} {}", response.status(), response.url()))
//!     .on_html("a[href]", |element| {
//!         if let Some(href) = element.attr("href") {
//!             let _ = element.visit(href);
//!         }
//!     })
//!     .build()?;
//!
//! engine.visit("https://example.com/")?;
//! engine.wait().await;
//! # Ok(())
//! # }
//! ```

mod error;
mod fetcher;
mod parser;
mod request;

pub use error::{EngineError, VisitError};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use request::{HtmlElement, Request, Response};

use crate::config::EngineConfig;
use crate::state::CompletionTracker;
use crate::url::{extract_domain, is_domain_allowed, visit_key};
use reqwest::Client;
use scraper::Selector;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

type RequestHook = Box<dyn Fn(&Request) + Send + Sync>;
type ResponseHook = Box<dyn Fn(&Response) + Send + Sync>;
type HtmlHook = Box<dyn Fn(&HtmlElement) + Send + Sync>;
type ErrorHook = Box<dyn Fn(&Request, &VisitError) + Send + Sync>;

#[derive(Default)]
struct Hooks {
    request: Vec<RequestHook>,
    response: Vec<ResponseHook>,
    html: Vec<(Selector, HtmlHook)>,
    error: Vec<ErrorHook>,
}

/// Builder for `CrawlEngine`
pub struct EngineBuilder {
    max_depth: u32,
    parallel: bool,
    parallelism: usize,
    allowed_domains: Vec<String>,
    user_agent: String,
    request_timeout: Duration,
    hooks: Hooks,
    pending_selectors: Vec<(String, HtmlHook)>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        let defaults = EngineConfig::default();
        Self {
            max_depth: 1,
            parallel: false,
            parallelism: defaults.parallelism as usize,
            allowed_domains: Vec::new(),
            user_agent: defaults.user_agent,
            request_timeout: Duration::from_secs(defaults.request_timeout),
            hooks: Hooks::default(),
            pending_selectors: Vec::new(),
        }
    }
}

impl EngineBuilder {
    /// Deepest link hop that may still be fetched (the seed is depth 0)
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Fetch several pages at once instead of one after another
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of concurrent fetches in parallel mode
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Hosts that may be fetched; an empty list allows every host
    pub fn allowed_domains(mut self, allowed_domains: Vec<String>) -> Self {
        self.allowed_domains = allowed_domains;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Applies user agent, timeout and parallelism from an engine config
    pub fn engine_config(self, config: &EngineConfig) -> Self {
        self.user_agent(config.user_agent.clone())
            .request_timeout(Duration::from_secs(config.request_timeout))
            .parallelism(config.parallelism as usize)
    }

    /// Called before each request is sent
    pub fn on_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request) + Send + Sync + 'static,
    {
        self.hooks.request.push(Box::new(hook));
        self
    }

    /// Called for every 2xx response
    pub fn on_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Response) + Send + Sync + 'static,
    {
        self.hooks.response.push(Box::new(hook));
        self
    }

    /// Called for every element of an HTML response matching `selector`
    pub fn on_html<F>(mut self, selector: &str, hook: F) -> Self
    where
        F: Fn(&HtmlElement) + Send + Sync + 'static,
    {
        self.pending_selectors
            .push((selector.to_string(), Box::new(hook)));
        self
    }

    /// Called when a fetch fails or returns a non-2xx status
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request, &VisitError) + Send + Sync + 'static,
    {
        self.hooks.error.push(Box::new(hook));
        self
    }

    /// Builds the engine
    ///
    /// # Errors
    ///
    /// * `EngineError::Selector` - An `on_html` selector did not parse
    /// * `EngineError::Client` - The HTTP client could not be built
    pub fn build(mut self) -> Result<CrawlEngine, EngineError> {
        for (selector, hook) in self.pending_selectors {
            let parsed = parser::parse_selector(&selector).map_err(EngineError::Selector)?;
            self.hooks.html.push((parsed, hook));
        }

        let client = build_http_client(
            &self.user_agent,
            self.request_timeout,
            self.allowed_domains.clone(),
        )?;

        let permits = if self.parallel { self.parallelism } else { 1 };

        Ok(CrawlEngine {
            inner: Arc::new(EngineInner {
                max_depth: self.max_depth,
                allowed_domains: self.allowed_domains,
                client,
                permits: Arc::new(Semaphore::new(permits)),
                visited: Mutex::new(HashSet::new()),
                in_flight: CompletionTracker::new("fetch"),
                next_request_id: AtomicU64::new(1),
                hooks: self.hooks,
            }),
        })
    }
}

struct EngineInner {
    max_depth: u32,
    allowed_domains: Vec<String>,
    client: Client,
    permits: Arc<Semaphore>,
    visited: Mutex<HashSet<String>>,
    in_flight: CompletionTracker,
    next_request_id: AtomicU64,
    hooks: Hooks,
}

/// Depth-limited, domain-restricted crawler
///
/// Cloning is cheap; clones share hooks, visited set and in-flight tracking.
#[derive(Clone)]
pub struct CrawlEngine {
    inner: Arc<EngineInner>,
}

impl CrawlEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Requests a visit to a seed URL (depth 0)
    ///
    /// Must be called from within a Tokio runtime. Returns as soon as the
    /// fetch is scheduled; use `wait` to block until traversal finishes.
    pub fn visit(&self, url: &str) -> Result<(), VisitError> {
        let parsed = Url::parse(url).map_err(|source| VisitError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        self.schedule(parsed, 0)
    }

    /// Waits until no fetch task is in flight
    pub async fn wait(&self) {
        self.inner.in_flight.wait().await;
    }

    /// Number of distinct URLs accepted for fetching so far
    pub fn visited_count(&self) -> usize {
        self.visited().len()
    }

    pub(crate) fn schedule(&self, url: Url, depth: u32) -> Result<(), VisitError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(VisitError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
                url: url.into(),
            });
        }

        if depth > self.inner.max_depth {
            return Err(VisitError::MaxDepth {
                url: url.into(),
                depth,
                max_depth: self.inner.max_depth,
            });
        }

        let allowed = extract_domain(&url)
            .map(|host| is_domain_allowed(&self.inner.allowed_domains, &host))
            .unwrap_or(false);
        if !allowed {
            return Err(VisitError::ForbiddenDomain { url: url.into() });
        }

        let key = visit_key(&url);
        if !self.visited().insert(key.clone()) {
            return Err(VisitError::AlreadyVisited { url: key });
        }

        // Counted before the task exists so `wait` cannot observe a gap.
        let guard = self.inner.in_flight.enter();
        let request = Request {
            id: self.inner.next_request_id.fetch_add(1, Ordering::Relaxed),
            url,
            depth,
        };

        let engine = self.clone();
        tokio::spawn(async move {
            let _guard = guard;
            engine.fetch(request).await;
        });

        Ok(())
    }

    async fn fetch(&self, request: Request) {
        let request = Arc::new(request);
        let hooks = &self.inner.hooks;

        let fetched = {
            // The semaphore is never closed.
            let _permit = self.inner.permits.acquire().await.ok();

            for hook in &hooks.request {
                hook(&request);
            }

            tracing::debug!("Fetching {} (depth {})", request.url, request.depth);
            fetch_page(&self.inner.client, &request.url).await
        };

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                self.report_error(&request, &e);
                return;
            }
        };

        if !page.status.is_success() {
            let error = VisitError::Status {
                url: page.final_url.to_string(),
                status: page.status.as_u16(),
            };
            self.report_error(&request, &error);
            return;
        }

        let response = Response {
            request: Arc::clone(&request),
            final_url: page.final_url,
            status: page.status,
            headers: page.headers,
            body: page.body,
        };

        for hook in &hooks.response {
            hook(&response);
        }

        if hooks.html.is_empty() || !response.is_html() {
            return;
        }

        let selectors: Vec<&Selector> = hooks.html.iter().map(|(s, _)| s).collect();
        let html = String::from_utf8_lossy(&response.body);
        let matches = parser::select_elements(&html, &selectors);

        for ((_, hook), elements) in hooks.html.iter().zip(matches) {
            for data in elements {
                let element = HtmlElement {
                    name: data.name,
                    attributes: data.attributes,
                    text: data.text,
                    page_url: response.final_url.clone(),
                    request: Arc::clone(&request),
                    engine: self.clone(),
                };
                hook(&element);
            }
        }
    }

    fn report_error(&self, request: &Request, error: &VisitError) {
        tracing::debug!("Fetch of {} failed: {}", request.url, error);
        for hook in &self.inner.hooks.error {
            hook(request, error);
        }
    }

    fn visited(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // The set is only ever inserted into, so a poisoned guard is still consistent.
        self.inner
            .visited
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}
