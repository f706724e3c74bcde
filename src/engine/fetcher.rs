//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawl engine:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Keeping redirects inside the allowed domains
//! - Sending GET requests and reading the full body

use crate::engine::VisitError;
use crate::url::{extract_domain, is_domain_allowed};
use reqwest::header::HeaderMap;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Maximum number of redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Raw result of a GET request
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Page body content
    pub body: Vec<u8>,
}

/// Builds an HTTP client for the crawl engine
///
/// Redirects are followed up to ten hops as long as every hop stays on an
/// allowed host. A redirect that leaves the allow-list is not followed, so the
/// 3xx response surfaces as a status error.
///
/// # Arguments
///
/// * `user_agent` - User agent sent with every request
/// * `timeout` - Total time allowed for one request
/// * `allowed_domains` - Hosts redirects may point to (empty allows all)
pub fn build_http_client(
    user_agent: &str,
    timeout: Duration,
    allowed_domains: Vec<String>,
) -> Result<Client, reqwest::Error> {
    let redirect_policy = Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let allowed = extract_domain(attempt.url())
            .map(|host| is_domain_allowed(&allowed_domains, &host))
            .unwrap_or(false);
        if allowed {
            attempt.follow()
        } else {
            attempt.stop()
        }
    });

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(redirect_policy)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and reads its body
///
/// Any status is returned as-is; deciding which statuses count as a page is
/// left to the caller. Transport failures and body read failures are mapped
/// to `VisitError::Http`.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, VisitError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| VisitError::Http {
            url: url.to_string(),
            source,
        })?;

    let final_url = response.url().clone();
    let status = response.status();
    let headers = response.headers().clone();

    let body = response
        .bytes()
        .await
        .map_err(|source| VisitError::Http {
            url: url.to_string(),
            source,
        })?
        .to_vec();

    Ok(FetchedPage {
        final_url,
        status,
        headers,
        body,
    })
}
