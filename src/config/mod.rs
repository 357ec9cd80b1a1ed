//! Configuration module for the Webpage Analyzer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional, so an empty file (or no file at all) yields the
//! defaults.
//!
//! # Example
//!
//! ```no_run
//! use webpage_analyzer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("analyzer.toml")).unwrap();
//! println!("Fetch timeout: {}s", config.fetcher.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnalysisConfig, CacheConfig, Config, FetcherConfig, ServerConfig};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
