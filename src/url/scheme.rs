//! Syntactic scheme detection for href values
//!
//! `Url::parse` cannot tell a relative reference apart from a malformed
//! absolute one, so the classifier first decides from the raw text whether an
//! href names a scheme at all.

/// Returns the scheme of an href in lowercase, if it names one
///
/// A scheme is a letter followed by letters, digits, `+`, `-` or `.`, ending
/// at the first `:`. Anything before a `/`, `?` or `#` that fails this shape
/// means the href is a relative reference.
///
/// # Examples
///
/// ```
/// use webpage_analyzer::url::scheme_of;
///
/// assert_eq!(scheme_of("HTTPS://example.com"), Some("https".to_string()));
/// assert_eq!(scheme_of("mailto:me@example.com"), Some("mailto".to_string()));
/// assert_eq!(scheme_of("/about"), None);
/// assert_eq!(scheme_of("page.html?x=a:b"), None);
/// ```
pub fn scheme_of(href: &str) -> Option<String> {
    let (candidate, _) = href.split_once(':')?;

    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }

    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate.to_ascii_lowercase())
    } else {
        None
    }
}

/// Returns true for network-path references such as `//cdn.example.com/x`
pub fn is_protocol_relative(href: &str) -> bool {
    href.starts_with("//")
}
