//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.dk-admin/config.toml`
//! 3. **Project config** - `./.dk-admin/config.toml`
//! 4. **Environment** - `DK_ADMIN_API_BASE_URL`, `DK_ADMIN_TOKEN`, `DK_ADMIN_SESSION_TOKEN`
//! 5. **CLI arguments** - Command-line flags (highest priority, applied by the caller)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::types::{AdminConfig, ApiConfig, ListConfig, PollingConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

pub const ENV_BASE_URL: &str = "DK_ADMIN_API_BASE_URL";
pub const ENV_ADMIN_TOKEN: &str = "DK_ADMIN_TOKEN";
pub const ENV_SESSION_TOKEN: &str = "DK_ADMIN_SESSION_TOKEN";

const CONFIG_DIR: &str = ".dk-admin";
const CONFIG_FILE: &str = "config.toml";

/// Load configuration from the hierarchy of config files and the environment.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed, or if the
/// merged configuration fails validation. Missing config files are not errors.
pub fn load_hierarchy() -> Result<AdminConfig, ConfigError> {
    let config = load_merged()?;
    validate_config(&config)?;
    Ok(config)
}

/// Merge every layer without validating, so a caller can apply its own
/// overrides (CLI flags) before checking the result.
pub fn load_merged() -> Result<AdminConfig, ConfigError> {
    let mut config = AdminConfig::default();

    if let Some(path) = user_config_path()
        && let Some(user_config) = load_config_file(&path)?
    {
        config = merge_configs(config, user_config);
    }

    let project_path = std::env::current_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    if let Some(project_config) = load_config_file(&project_path)? {
        config = merge_configs(config, project_config);
    }

    config = apply_env_overrides(config, |key| std::env::var(key).ok());

    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load a configuration file, returning `None` if it does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<AdminConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(event = "core.config.file_missing", path = %path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let config: AdminConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    debug!(event = "core.config.file_loaded", path = %path.display());
    Ok(Some(config))
}

/// Merge two configurations, with `override_config` taking precedence
/// wherever it sets a value.
pub fn merge_configs(base: AdminConfig, override_config: AdminConfig) -> AdminConfig {
    AdminConfig {
        api: ApiConfig {
            base_url: override_config.api.base_url.or(base.api.base_url),
            admin_token: override_config.api.admin_token.or(base.api.admin_token),
            session_token: override_config.api.session_token.or(base.api.session_token),
        },
        list: ListConfig {
            page_size: override_config.list.page_size.or(base.list.page_size),
            fetch_limit: override_config.list.fetch_limit.or(base.list.fetch_limit),
        },
        polling: PollingConfig {
            interval_secs: override_config
                .polling
                .interval_secs
                .or(base.polling.interval_secs),
            request_limit: override_config
                .polling
                .request_limit
                .or(base.polling.request_limit),
        },
    }
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Empty values are ignored so an exported-but-blank variable does not wipe
/// a configured token.
pub fn apply_env_overrides<F>(mut config: AdminConfig, lookup: F) -> AdminConfig
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = read(ENV_BASE_URL) {
        config.api.base_url = Some(url);
    }
    if let Some(token) = read(ENV_ADMIN_TOKEN) {
        config.api.admin_token = Some(token);
    }
    if let Some(token) = read(ENV_SESSION_TOKEN) {
        config.api.session_token = Some(token);
    }
    config
}
