//! Configuration module for Sitescope
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sitescope::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitescope.toml")).unwrap();
//! println!("Crawling {} to depth {}", config.scraper.website, config.scraper.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, EngineConfig, ScraperConfig};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_engine_config, validate_scraper_config};
