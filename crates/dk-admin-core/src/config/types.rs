//! Configuration type definitions for the admin panel.
//!
//! These types are serialized/deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080/api/v1"
//! admin_token = "s3cret"
//!
//! [list]
//! page_size = 20
//! fetch_limit = 200
//!
//! [polling]
//! interval_secs = 30
//! ```

use serde::{Deserialize, Serialize};

/// Main configuration loaded from TOML config files and the environment.
///
/// Every field is optional so that layers can be merged; use the accessor
/// methods to read effective values with defaults applied.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AdminConfig {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// List store settings
    #[serde(default)]
    pub list: ListConfig,

    /// Dashboard and monitoring refresh settings
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Backend connection settings.
#[derive(Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the REST backend, including the `/api/v1` prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Static shared secret sent as `x-admin-token` on every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,

    /// Optional session token sent as `Authorization: Bearer` (laptop endpoints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// List store settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ListConfig {
    /// Rows per client-side page. Default: 20.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,

    /// `limit` query parameter for catalog fetches. Default: 200.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_limit: Option<u32>,
}

/// Polling refresh settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PollingConfig {
    /// Seconds between refreshes. Default: 30.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,

    /// `limit` for the recent-request listing. Default: 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_config_serialization_roundtrip() {
        let config = AdminConfig {
            api: ApiConfig {
                base_url: Some("http://localhost:8080/api/v1".to_string()),
                admin_token: None,
                session_token: None,
            },
            list: ListConfig {
                page_size: Some(50),
                fetch_limit: None,
            },
            polling: PollingConfig::default(),
        };
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("page_size = 50"));
        assert!(!toml_str.contains("fetch_limit"));
        let parsed: AdminConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_api_config_debug_redacts_tokens() {
        let api = ApiConfig {
            base_url: None,
            admin_token: Some("very-secret".to_string()),
            session_token: Some("bearer-secret".to_string()),
        };
        let debug = format!("{:?}", api);
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("bearer-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_empty_sections_deserialize() {
        let config: AdminConfig = toml::from_str("[api]\n[list]\n").unwrap();
        assert_eq!(config, AdminConfig::default());
    }
}
