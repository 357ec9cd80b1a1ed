//! Webpage Analyzer: a structural summary of a single web page
//!
//! This crate fetches one page, parses it into an immutable document tree, and
//! runs a fixed set of independent extraction passes over that tree on a
//! bounded worker pool. The passes report the declared HTML version, the page
//! title, a heading histogram, a three-way link classification, and whether
//! the page appears to contain a login form.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod document;
pub mod fetch;
pub mod pool;
pub mod server;
pub mod service;
pub mod url;

use serde::Serialize;
use thiserror::Error;

/// Main error type for Webpage Analyzer operations
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Worker pool error: {0}")]
    Pool(#[from] pool::PoolError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// A classified failure while analyzing one URL
///
/// This is the only failure the front door reports with a `400`; everything
/// else surfaces as an internal error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("HTTP {status_code}: {error_message} (URL: {url})")]
pub struct AnalysisError {
    pub status_code: u16,
    pub error_message: String,
    pub url: String,
}

impl AnalysisError {
    pub fn new(status_code: u16, error_message: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status_code,
            error_message: error_message.into(),
            url: url.into(),
        }
    }
}

// Re-export commonly used types
pub use analysis::{AnalysisRecord, LinkClass, LinkCounts, SpecialSchemePolicy};
pub use cache::{BoundedCache, MemoryCache, NoopCache, ResultCache};
pub use config::Config;
pub use document::{Document, DocumentParser, HtmlDocumentParser};
pub use fetch::{FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use pool::{TaskGroup, WorkerPool};
pub use service::AnalysisService;
