//! Transport error taxonomy
//!
//! Transport failures are terminal for a request and are never retried. Each
//! kind carries the status-like code reported to callers.

use std::error::Error as StdError;
use thiserror::Error;

/// Why a page could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("DNS resolution failed: The domain could not be found. Please check if the URL is correct.")]
    Dns,

    #[error("Connection refused: The server is not accepting connections. The service might be down or the port might be closed.")]
    ConnectionRefused,

    #[error("Request timeout: The server took too long to respond. Please try again later.")]
    Timeout,

    #[error("SSL/TLS error: There was a problem with the security certificate. The connection is not secure.")]
    Tls,

    #[error("Protocol error: The URL uses an unsupported protocol. Please use http:// or https://.")]
    Protocol,

    #[error("Network unreachable: Cannot reach the server. Please check your internet connection.")]
    Unreachable,

    #[error("Response too large: The page exceeds the {limit} byte limit.")]
    BodyTooLarge { limit: usize },

    #[error("Network error: {0}. Please check your internet connection and try again.")]
    Network(String),
}

impl FetchError {
    /// The status-like code reported for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            FetchError::InvalidUrl(_) => 400,
            FetchError::Dns => 404,
            FetchError::ConnectionRefused => 503,
            FetchError::Timeout => 408,
            FetchError::Tls => 495,
            FetchError::Protocol => 400,
            FetchError::Unreachable => 503,
            FetchError::BodyTooLarge { .. } => 413,
            FetchError::Network(_) => 503,
        }
    }
}

/// Maps a `reqwest` failure onto the taxonomy
pub fn classify_error(err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout;
    }
    if err.is_builder() {
        return FetchError::Protocol;
    }

    classify_message(&error_chain(err)).unwrap_or_else(|| FetchError::Network(err.to_string()))
}

/// Classifies a lower-cased error description
///
/// The checks run in a fixed order; the first family that matches wins.
pub(crate) fn classify_message(message: &str) -> Option<FetchError> {
    let message = message.to_lowercase();
    let mentions = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

    if mentions(&[
        "dns error",
        "failed to lookup",
        "no such host",
        "name or service not known",
        "nodename nor servname",
    ]) {
        Some(FetchError::Dns)
    } else if mentions(&["connection refused"]) {
        Some(FetchError::ConnectionRefused)
    } else if mentions(&["timed out", "timeout", "deadline exceeded"]) {
        Some(FetchError::Timeout)
    } else if mentions(&["certificate", "tls", "ssl", "handshake"]) {
        Some(FetchError::Tls)
    } else if mentions(&["unsupported protocol", "url scheme is not allowed", "protocol"]) {
        Some(FetchError::Protocol)
    } else if mentions(&["network is unreachable", "no route to host", "host is unreachable"]) {
        Some(FetchError::Unreachable)
    } else {
        None
    }
}

/// Joins an error with all of its sources
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}
