use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Upstream section exists (enforced by serde)
/// - Upstream base_url is a non-empty http(s) URL
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Upstream validation
    if config.upstream.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "upstream.base_url cannot be empty".to_string(),
        ));
    }
    if !config.upstream.base_url.starts_with("http://")
        && !config.upstream.base_url.starts_with("https://")
    {
        return Err(ConfigError::ValidationError(
            "upstream.base_url must start with http:// or https://".to_string(),
        ));
    }
    if config.upstream.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "upstream.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
