//! Values handed to engine hooks

use crate::engine::{CrawlEngine, VisitError};
use crate::url::resolve_link;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// A scheduled fetch
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) id: u64,
    pub(crate) url: Url,
    pub(crate) depth: u32,
}

impl Request {
    /// Engine-assigned ID, unique for the lifetime of the engine
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Number of link hops from the seed URL
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// A successful (2xx) HTTP response
#[derive(Debug)]
pub struct Response {
    pub(crate) request: Arc<Request>,
    pub(crate) final_url: Url,
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
}

impl Response {
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// URL the body was served from, after redirects
    pub fn url(&self) -> &Url {
        &self.final_url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns true if the Content-Type header mentions HTML
    pub fn is_html(&self) -> bool {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.to_ascii_lowercase().contains("html"))
            .unwrap_or(false)
    }
}

/// An element matched by an `on_html` selector
pub struct HtmlElement {
    pub(crate) name: String,
    pub(crate) attributes: HashMap<String, String>,
    pub(crate) text: String,
    pub(crate) page_url: Url,
    pub(crate) request: Arc<Request>,
    pub(crate) engine: CrawlEngine,
}

impl HtmlElement {
    /// Tag name of the element
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Concatenated text content of the element
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The request whose response contained this element
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Requests a visit to `href`, resolved against the page this element came from
    ///
    /// The new request is one hop deeper than the current page.
    pub fn visit(&self, href: &str) -> Result<(), VisitError> {
        let url = resolve_link(href, &self.page_url).ok_or(VisitError::MissingUrl)?;
        self.engine.schedule(url, self.request.depth + 1)
    }
}

impl std::fmt::Debug for HtmlElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlElement")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("page_url", &self.page_url.as_str())
            .field("depth", &self.request.depth)
            .finish()
    }
}
