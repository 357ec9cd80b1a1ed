//! reqwest-backed fetcher

use super::error::classify_error;
use super::{FetchError, FetchedPage, Fetcher};
use crate::config::FetcherConfig;
use crate::url::parse_page_url;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

/// Fetches pages over HTTP(S)
///
/// Redirects are followed by the client. Non-success statuses are returned as
/// `Ok` so the caller can decide how to report them.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Builds a fetcher from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Timeouts, user agent and body limit
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Successfully built HTTP client
    /// * `Err(reqwest::Error)` - Failed to build client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use webpage_analyzer::config::FetcherConfig;
    /// use webpage_analyzer::fetch::HttpFetcher;
    ///
    /// let fetcher = HttpFetcher::new(&FetcherConfig::default()).unwrap();
    /// ```
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let target = parse_page_url(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let mut response = self
            .client
            .get(target)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .send()
            .await
            .map_err(|e| classify_error(&e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let limit = self.max_body_bytes;

        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchError::BodyTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| classify_error(&e))? {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!("Fetched {} ({} bytes, status {})", final_url, body.len(), status);

        Ok(FetchedPage {
            body,
            status,
            final_url,
        })
    }
}
