//! Output module for page statistics and crawl reports
//!
//! This module handles:
//! - The per-page statistics record and the lock-guarded store it lives in
//! - Printing a report to stdout
//! - Writing a markdown report

mod markdown;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_report, generate_markdown_report, RunInfo};
pub use stats::{print_report, summarize, CrawlTotals, PageStats, StatsStore};
pub use traits::{OutputError, OutputResult, PageRecord, StatsError};
