/// Checks if a host is on the allow-list
///
/// Matching is exact against each entry. Entries that carry a scheme
/// (`https://example.com`) never match a bare host and are kept only so the
/// list can be handed to tooling that expects them. An empty allow-list
/// permits every host.
///
/// # Arguments
///
/// * `allowed` - The allow-list produced by `prepare_allowed_domains`
/// * `host` - The lowercase host to check (no port)
///
/// # Examples
///
/// ```
/// use sitescope::url::is_domain_allowed;
///
/// let allowed = vec!["example.com".to_string(), "www.example.com".to_string()];
/// assert!(is_domain_allowed(&allowed, "www.example.com"));
/// assert!(!is_domain_allowed(&allowed, "blog.example.com"));
/// assert!(is_domain_allowed(&[], "anything.org"));
/// ```
pub fn is_domain_allowed(allowed: &[String], host: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|entry| entry == host)
}
