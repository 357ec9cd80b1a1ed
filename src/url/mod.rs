//! URL helpers for link classification
//!
//! This module provides host extraction and the purely syntactic checks the
//! link classifier relies on. Nothing here performs DNS lookups or any other
//! network I/O.

mod domain;
mod scheme;

pub use domain::{extract_host, same_host};
pub use scheme::{is_protocol_relative, scheme_of};

use thiserror::Error;
use url::Url;

/// Errors for URLs submitted for analysis
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0} (use http:// or https://)")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Parses and checks a URL submitted for analysis
///
/// Only absolute `http`/`https` URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use webpage_analyzer::url::parse_page_url;
///
/// assert!(parse_page_url("https://example.com/").is_ok());
/// assert!(parse_page_url("ftp://example.com/").is_err());
/// assert!(parse_page_url("example.com").is_err());
/// ```
pub fn parse_page_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
