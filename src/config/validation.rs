use crate::config::types::{Config, EngineConfig, ScraperConfig};
use crate::ConfigError;
use url::Url;

/// Deepest crawl the configuration accepts
const MAX_DEPTH_LIMIT: u32 = 64;

/// Upper bound for concurrent fetches
const MAX_PARALLELISM: u32 = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_engine_config(&config.engine)?;
    Ok(())
}

/// Validates scraper configuration
///
/// The seed is only checked for being an absolute URL here; deriving the
/// allowed domains happens when the crawl starts.
pub fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.website.is_empty() {
        return Err(ConfigError::Validation(
            "website cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.website).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid website '{}': {}", config.website, e))
    })?;

    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be at most {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    Ok(())
}

/// Validates engine configuration
pub fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.parallelism < 1 || config.parallelism > MAX_PARALLELISM {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and {}, got {}",
            MAX_PARALLELISM, config.parallelism
        )));
    }

    Ok(())
}
