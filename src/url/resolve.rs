use url::Url;

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only anchors
/// - hrefs that cannot be joined onto the base URL
///
/// The fragment of the resolved URL is removed. Scheme filtering is left to
/// the caller so that `mailto:` and friends surface as unsupported-scheme
/// visits rather than disappearing silently.
///
/// # Examples
///
/// ```
/// use sitescope::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/page").unwrap();
/// let resolved = resolve_link("other#intro", &base).unwrap();
/// assert_eq!(resolved.as_str(), "https://example.com/docs/other");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    // Skip empty hrefs
    if href.is_empty() {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    absolute_url.set_fragment(None);
    Some(absolute_url)
}

/// Returns the key used to decide whether a URL was already visited
///
/// Two URLs that differ only in their fragment share a key.
pub fn visit_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}
