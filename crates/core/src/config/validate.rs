use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Storage and site paths are not empty
/// - OMDb section (if present) has an API key, an http(s) base URL and a non-zero timeout
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.storage.resolved_path().as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.path cannot be empty".to_string(),
        ));
    }

    if config.site.template_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "site.template_path cannot be empty".to_string(),
        ));
    }
    if config.site.output_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "site.output_path cannot be empty".to_string(),
        ));
    }

    if let Some(omdb) = &config.omdb {
        if omdb.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "omdb.api_key cannot be empty".to_string(),
            ));
        }
        if !(omdb.base_url.starts_with("http://") || omdb.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "omdb.base_url must be an http(s) URL, got '{}'",
                omdb.base_url
            )));
        }
        if omdb.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "omdb.timeout_secs cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}
