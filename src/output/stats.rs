//! Per-page statistics and the shared store they accumulate in

use crate::crawler::PageResponse;
use crate::output::traits::{PageRecord, StatsError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Accumulated statistics for one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageStats {
    /// The page URL (store key)
    pub url: String,

    /// Status code of the most recent response
    pub status_code: u16,

    /// Shallowest depth the page was fetched at
    pub depth: u32,

    /// Number of responses recorded for this page
    pub hits: u32,

    /// Sum of fetch durations
    pub total_duration: Duration,

    /// Slowest single fetch
    pub max_duration: Duration,

    /// Sum of body sizes in bytes
    pub total_bytes: u64,

    /// Content-Type of the most recent response
    pub content_type: Option<String>,

    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl PageStats {
    /// Mean fetch duration across all hits
    pub fn average_duration(&self) -> Duration {
        if self.hits == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.hits
        }
    }
}

impl PageRecord for PageStats {
    fn from_response(response: &PageResponse) -> Self {
        let now = Utc::now();
        Self {
            url: response.url.clone(),
            status_code: response.status_code,
            depth: response.depth,
            hits: 1,
            total_duration: response.duration,
            max_duration: response.duration,
            total_bytes: response.body.len() as u64,
            content_type: response.content_type().map(str::to_string),
            first_seen: now,
            last_seen: now,
        }
    }

    fn accumulate(&mut self, response: &PageResponse) {
        self.status_code = response.status_code;
        self.depth = self.depth.min(response.depth);
        self.hits += 1;
        self.total_duration += response.duration;
        self.max_duration = self.max_duration.max(response.duration);
        self.total_bytes += response.body.len() as u64;
        if let Some(content_type) = response.content_type() {
            self.content_type = Some(content_type.to_string());
        }
        self.last_seen = Utc::now();
    }
}

/// Lock-guarded map from page key to accumulated record
///
/// Cloning shares the underlying map. Each upsert builds the new record
/// before touching the map, so a reader never sees a half-applied update.
#[derive(Debug)]
pub struct StatsStore<R = PageStats> {
    entries: Arc<Mutex<HashMap<String, R>>>,
}

impl<R> Clone for StatsStore<R> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<R> Default for StatsStore<R> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<R: PageRecord> StatsStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the record for a page or folds the response into the existing one
    ///
    /// A lock poisoned by an earlier panicking update is recovered: that update
    /// never reached the map, so every stored record is still whole.
    ///
    /// # Errors
    ///
    /// * `StatsError::EmptyKey` - The response has no identity to store under
    pub fn upsert(&self, response: &PageResponse) -> Result<(), StatsError> {
        let key = R::key(response);
        if key.is_empty() {
            return Err(StatsError::EmptyKey);
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let updated = match entries.get(&key) {
            Some(existing) => {
                let mut record = existing.clone();
                record.accumulate(response);
                record
            }
            None => R::from_response(response),
        };
        entries.insert(key, updated);
        Ok(())
    }

    /// Copies every record out of the store
    ///
    /// The order of the returned records is unspecified.
    pub fn snapshot(&self) -> Vec<R> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Number of distinct pages recorded
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Totals across a set of page records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlTotals {
    pub pages: usize,
    pub hits: u64,
    pub total_bytes: u64,
    pub max_depth: u32,
    pub average_duration: Duration,
    pub status_counts: HashMap<u16, usize>,
}

/// Computes totals for a report
pub fn summarize(stats: &[PageStats]) -> CrawlTotals {
    let mut totals = CrawlTotals {
        pages: stats.len(),
        ..Default::default()
    };

    let mut total_duration = Duration::ZERO;
    for page in stats {
        totals.hits += u64::from(page.hits);
        totals.total_bytes += page.total_bytes;
        totals.max_depth = totals.max_depth.max(page.depth);
        total_duration += page.total_duration;
        *totals.status_counts.entry(page.status_code).or_insert(0) += 1;
    }

    if totals.hits > 0 {
        let hits = u32::try_from(totals.hits).unwrap_or(u32::MAX);
        totals.average_duration = total_duration / hits;
    }

    totals
}

/// Prints a report to stdout in a formatted manner
///
/// Pages are listed by URL so repeated runs diff cleanly.
pub fn print_report(stats: &[PageStats]) {
    let totals = summarize(stats);

    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Pages recorded: {}", totals.pages);
    println!("  Responses: {}", totals.hits);
    println!("  Bytes received: {}", totals.total_bytes);
    println!("  Deepest page: {}", totals.max_depth);
    println!("  Average fetch time: {:?}", totals.average_duration);
    println!();

    if !totals.status_counts.is_empty() {
        println!("Pages by Status:");
        let mut status_counts: Vec<_> = totals.status_counts.iter().collect();
        status_counts.sort();
        for (status, count) in status_counts {
            println!("  {}: {}", status, count);
        }
        println!();
    }

    let mut pages: Vec<&PageStats> = stats.iter().collect();
    pages.sort_by(|a, b| a.url.cmp(&b.url));

    println!("Pages:");
    for page in pages {
        println!(
            "  [{}] depth {} {:>8}B {:>10.1?} {}",
            page.status_code,
            page.depth,
            page.total_bytes,
            page.average_duration(),
            page.url
        );
    }
}
