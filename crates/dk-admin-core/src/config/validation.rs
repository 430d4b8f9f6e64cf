use crate::config::types::AdminConfig;
use crate::errors::ConfigError;

/// Validate the merged configuration.
pub fn validate_config(config: &AdminConfig) -> Result<(), ConfigError> {
    let url = config.base_url();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl {
            url: url.to_string(),
        });
    }

    if config.list.page_size == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "list.page_size must be greater than 0".to_string(),
        });
    }

    if config.list.fetch_limit == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "list.fetch_limit must be greater than 0".to_string(),
        });
    }

    if config.polling.interval_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "polling.interval_secs must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AdminConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = AdminConfig::default();
        config.api.base_url = Some("localhost:8080".to_string());
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let mut config = AdminConfig::default();
        config.list.page_size = Some(0);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = AdminConfig::default();
        config.polling.interval_secs = Some(0);
        assert!(validate_config(&config).is_err());
    }
}
