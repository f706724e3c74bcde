//! Crawler module for scraping a website into page statistics
//!
//! This module contains the core scraping logic, including:
//! - Dispatching engine responses as page records
//! - Processing page records into the stats store on background tasks
//! - Overall scrape coordination and reporting

mod coordinator;
mod dispatcher;
mod log;
mod processor;

pub use coordinator::Scraper;
pub use dispatcher::{PageResponse, ResponseDispatcher};
pub use log::ScrapeLog;
pub use processor::PageProcessor;

use crate::config::{EngineConfig, ScraperConfig};
use crate::output::PageStats;
use crate::ScopeError;

/// Runs a complete scrape and returns its report
///
/// This is a convenience wrapper that:
/// 1. Creates a scraper for the configuration
/// 2. Runs the scrape to completion
/// 3. Returns the per-page statistics
///
/// # Example
///
/// ```no_run
/// use sitescope::config::{EngineConfig, ScraperConfig};
/// use sitescope::crawler::scrape;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pages = scrape(ScraperConfig::new("https://example.com/"), EngineConfig::default()).await?;
/// println!("Recorded {} pages", pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(
    config: ScraperConfig,
    engine_config: EngineConfig,
) -> Result<Vec<PageStats>, ScopeError> {
    let scraper = Scraper::with_engine_config(config, engine_config);
    scraper.scrape().await?;
    Ok(scraper.report())
}
