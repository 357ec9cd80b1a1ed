use crate::analysis::SpecialSchemePolicy;
use crate::pool::DEFAULT_WORKERS;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for the Webpage Analyzer
///
/// Every section and key is optional; missing values take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub fetcher: FetcherConfig,
    pub analysis: AnalysisConfig,
    pub cache: CacheConfig,
}

/// HTTP front door configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Frontend files served for any path outside `/api`; `docs.html` lives here
    #[serde(rename = "static-dir")]
    pub static_dir: PathBuf,

    /// OpenAPI document served at `/api/openapi`
    #[serde(rename = "openapi-file")]
    pub openapi_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: PathBuf::from("frontend/public"),
            openapi_file: PathBuf::from("api/swagger.yaml"),
        }
    }
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Largest response body accepted, in bytes
    #[serde(rename = "max-body-bytes")]
    pub max_body_bytes: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: "WebpageAnalyzer/1.0".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of worker threads running extraction passes
    pub workers: usize,

    /// Whether `mailto:` and `tel:` links count as internal or external
    #[serde(rename = "special-scheme-policy")]
    pub special_scheme_policy: SpecialSchemePolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            special_scheme_policy: SpecialSchemePolicy::default(),
        }
    }
}

/// Result cache configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached records; 0 keeps every record forever
    pub capacity: usize,
}
