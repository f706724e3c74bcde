use thiserror::Error;

/// Errors raised while building a crawl engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid CSS selector '{0}'")]
    Selector(String),
}

/// Reasons a URL was not visited
///
/// Everything up to `AlreadyVisited` is decided synchronously when a visit is
/// requested; `Http` and `Status` are reported later through the engine's
/// error hooks.
#[derive(Debug, Error)]
pub enum VisitError {
    #[error("Missing URL")]
    MissingUrl,

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Unsupported scheme '{scheme}' in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("Max depth {max_depth} exceeded by {url} (depth {depth})")]
    MaxDepth {
        url: String,
        depth: u32,
        max_depth: u32,
    },

    #[error("Forbidden domain: {url}")]
    ForbiddenDomain { url: String },

    #[error("URL already visited: {url}")]
    AlreadyVisited { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

impl VisitError {
    /// Returns true for the expected "seen this URL before" outcome
    pub fn is_already_visited(&self) -> bool {
        matches!(self, Self::AlreadyVisited { .. })
    }
}
