use url::Url;

/// Extracts the host of a URL in lowercase
///
/// Ports, paths, queries and fragments are ignored. Returns None for URLs
/// without a host such as `mailto:` or `data:` URLs.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webpage_analyzer::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_host(&url), None);
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Returns true if both URLs carry the same host, ignoring case
///
/// This is a full-label match: `blog.example.com` and `example.com` are
/// different hosts. A URL without a host never matches.
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}
