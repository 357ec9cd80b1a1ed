//! Fetch module
//!
//! This module retrieves page bytes for analysis, including:
//! - The `Fetcher` seam the service depends on
//! - A reqwest-backed implementation with timeouts and a body size limit
//! - Classification of transport failures into status-like codes
//! - User-facing explanations for HTTP error statuses

mod error;
mod http;
mod status;

pub use error::{classify_error, FetchError};
pub use http::HttpFetcher;
pub use status::status_message;

use async_trait::async_trait;

/// A retrieved response, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub body: Vec<u8>,
    pub status: u16,
    /// URL after redirects
    pub final_url: String,
}

impl FetchedPage {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves the raw bytes of a page
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}
