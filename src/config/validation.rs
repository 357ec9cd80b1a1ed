use crate::config::types::{AnalysisConfig, Config, FetcherConfig, ServerConfig};
use crate::ConfigError;

/// Upper bound for the request timeout, in seconds
const MAX_TIMEOUT_SECS: u64 = 300;

/// Upper bound for the extraction worker count
const MAX_WORKERS: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_analysis_config(&config.analysis)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    // Must be a legal header value: visible ASCII and spaces only
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if !config
        .user_agent
        .chars()
        .all(|c| c == ' ' || c.is_ascii_graphic())
    {
        return Err(ConfigError::Validation(format!(
            "user-agent must contain only printable ASCII characters, got '{}'",
            config.user_agent
        )));
    }

    if config.max_body_bytes == 0 {
        return Err(ConfigError::Validation(
            "max-body-bytes must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates analysis configuration
fn validate_analysis_config(config: &AnalysisConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    Ok(())
}
