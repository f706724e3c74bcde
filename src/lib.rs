//! Sitescope: a domain-scoped, depth-limited web crawler
//!
//! This crate crawls a single site starting from a seed URL, follows links
//! within the site's allowed host variants up to a maximum depth, and
//! accumulates per-page statistics on a pool of background tasks.

pub mod config;
pub mod crawler;
pub mod engine;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitescope operations
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl engine error: {0}")]
    Engine(#[from] engine::EngineError),

    #[error("Scraper #{id} has already run")]
    AlreadyScraped { id: i32 },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sitescope operations
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, EngineConfig, ScraperConfig};
pub use crawler::{PageResponse, Scraper};
pub use output::{PageStats, StatsStore};
pub use url::prepare_allowed_domains;
