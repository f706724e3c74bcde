use crate::ConfigError;
use url::Url;

/// Characters stripped from the front of the seed hostname
///
/// This is a character set, not a prefix: any run of leading `w` and `.`
/// characters is removed, so `wally.example.com` becomes `ally.example.com`.
const HOST_TRIM_SET: &[char] = &['w', '.'];

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (which shouldn't happen for valid HTTP(S) URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescope::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Derives the allowed host variants for a seed URL
///
/// The seed must be an absolute URL with a host. The hostname is stripped of
/// its leading `w`/`.` characters and the remaining domain is expanded into
/// six entries, in this order:
///
/// 1. `domain`
/// 2. `www.domain`
/// 3. `http://domain`
/// 4. `https://domain`
/// 5. `http://www.domain`
/// 6. `https://www.domain`
///
/// # Errors
///
/// Returns `ConfigError::InvalidUrl` when the seed is not an absolute URL or
/// has no host.
///
/// # Examples
///
/// ```
/// use sitescope::url::prepare_allowed_domains;
///
/// let allowed = prepare_allowed_domains("https://www.example.com/start").unwrap();
/// assert_eq!(allowed[0], "example.com");
/// assert_eq!(allowed[5], "https://www.example.com");
/// ```
pub fn prepare_allowed_domains(seed: &str) -> Result<Vec<String>, ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    let hostname = extract_domain(&url)
        .ok_or_else(|| ConfigError::InvalidUrl(format!("Seed URL '{}' has no host", seed)))?;

    let domain = hostname.trim_start_matches(HOST_TRIM_SET);

    Ok(vec![
        domain.to_string(),
        format!("www.{}", domain),
        format!("http://{}", domain),
        format!("https://{}", domain),
        format!("http://www.{}", domain),
        format!("https://www.{}", domain),
    ])
}
