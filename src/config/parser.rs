use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use webpage_analyzer::config::load_config;
///
/// let config = load_config(Path::new("analyzer.toml")).unwrap();
/// println!("Listening on port {}", config.server.port);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the file at `path` if given, otherwise validated defaults
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SpecialSchemePolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[server]
host = "0.0.0.0"
port = 9000
static-dir = "web/dist"
openapi-file = "web/openapi.yaml"

[fetcher]
timeout-secs = 15
connect-timeout-secs = 5
user-agent = "TestAnalyzer/0.1"
max-body-bytes = 2048

[analysis]
workers = 8
special-scheme-policy = "internal"

[cache]
capacity = 100
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.static_dir, Path::new("web/dist"));
        assert_eq!(config.server.openapi_file, Path::new("web/openapi.yaml"));
        assert_eq!(config.fetcher.timeout_secs, 15);
        assert_eq!(config.fetcher.connect_timeout_secs, 5);
        assert_eq!(config.fetcher.user_agent, "TestAnalyzer/0.1");
        assert_eq!(config.fetcher.max_body_bytes, 2048);
        assert_eq!(config.analysis.workers, 8);
        assert_eq!(
            config.analysis.special_scheme_policy,
            SpecialSchemePolicy::Internal
        );
        assert_eq!(config.cache.capacity, 100);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir, Path::new("frontend/public"));
        assert_eq!(config.server.openapi_file, Path::new("api/swagger.yaml"));
        assert_eq!(config.fetcher.timeout_secs, 30);
        assert_eq!(config.fetcher.connect_timeout_secs, 10);
        assert_eq!(config.fetcher.user_agent, "WebpageAnalyzer/1.0");
        assert_eq!(config.fetcher.max_body_bytes, 10_485_760);
        assert_eq!(config.analysis.workers, 5);
        assert_eq!(
            config.analysis.special_scheme_policy,
            SpecialSchemePolicy::External
        );
        assert_eq!(config.cache.capacity, 0);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[fetcher]\ntimeout-secs = 60\n").unwrap();
        assert_eq!(config.fetcher.timeout_secs, 60);
        assert_eq!(config.fetcher.connect_timeout_secs, 10);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/analyzer.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("[server\nport = ");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let result = parse_config("[analysis]\nspecial-scheme-policy = \"sometimes\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let result = parse_config("[fetcher]\ntimeout-secs = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_or_default() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config.server.port, 8080);

        let file = create_temp_config("[server]\nport = 1234\n");
        let config = load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 1234);
    }
}
