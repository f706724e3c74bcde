use serde::Deserialize;

/// Main configuration structure for Sitescope
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// What to crawl and how the scraper behaves
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScraperConfig {
    /// Identifier used to tag this scraper's log lines
    #[serde(default)]
    pub id: i32,

    /// Seed URL the crawl starts from
    pub website: String,

    /// Maximum number of link hops from the seed
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Follow links found on fetched pages
    #[serde(default = "default_true")]
    pub recursively: bool,

    /// Emit the scraper's progress log lines
    #[serde(default = "default_true")]
    pub print_logs: bool,

    /// Fetch pages concurrently instead of one at a time
    #[serde(default, rename = "async")]
    pub async_mode: bool,
}

impl ScraperConfig {
    /// Creates a configuration for `website` with default settings
    pub fn new(website: impl Into<String>) -> Self {
        Self {
            id: 0,
            website: website.into(),
            max_depth: default_max_depth(),
            recursively: true,
            print_logs: true,
            async_mode: false,
        }
    }
}

/// HTTP settings for the crawl engine
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EngineConfig {
    /// User agent sent with every request
    pub user_agent: String,

    /// Total time allowed for one request (seconds)
    pub request_timeout: u64,

    /// Maximum number of concurrent fetches in async mode
    pub parallelism: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("sitescope/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: 30,
            parallelism: 8,
        }
    }
}

fn default_max_depth() -> u32 {
    2
}

fn default_true() -> bool {
    true
}
