//! # Configuration System
//!
//! Hierarchical TOML configuration for the admin panel.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.dk-admin/config.toml`
//! 3. **Project config** - `./.dk-admin/config.toml`
//! 4. **Environment** - `DK_ADMIN_API_BASE_URL`, `DK_ADMIN_TOKEN`, `DK_ADMIN_SESSION_TOKEN`
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.dk-admin/config.toml
//! [api]
//! base_url = "http://localhost:8080/api/v1"
//! admin_token = "s3cret"
//!
//! [list]
//! page_size = 20
//! ```
//!
//! ```rust,no_run
//! use dk_admin_core::config::AdminConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AdminConfig::load_hierarchy()?;
//!     println!("{}", config.base_url());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{AdminConfig, ApiConfig, ListConfig, PollingConfig};
pub use validation::validate_config;

impl AdminConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Merge the hierarchy without validating it.
    ///
    /// See [`loading::load_merged`] for details.
    pub fn load_merged() -> Result<Self, crate::errors::ConfigError> {
        loading::load_merged()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
