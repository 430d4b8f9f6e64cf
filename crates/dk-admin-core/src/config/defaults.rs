//! Default values for configuration and the accessors that apply them.

use std::time::Duration;

use crate::config::types::AdminConfig;

/// Remote backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://gpu-compare-backend-production.up.railway.app/api/v1";

/// Rows per client-side page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// `limit` sent with catalog list fetches.
pub const DEFAULT_FETCH_LIMIT: u32 = 200;

/// Dashboard and monitoring refresh interval.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// `limit` sent with the recent-request listing.
pub const DEFAULT_REQUEST_LIMIT: u32 = 100;

impl AdminConfig {
    pub fn base_url(&self) -> &str {
        self.api.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn admin_token(&self) -> Option<&str> {
        self.api.admin_token.as_deref()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.api.session_token.as_deref()
    }

    pub fn page_size(&self) -> usize {
        self.list.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn fetch_limit(&self) -> u32 {
        self.list.fetch_limit.unwrap_or(DEFAULT_FETCH_LIMIT)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(
            self.polling
                .interval_secs
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        )
    }

    pub fn request_limit(&self) -> u32 {
        self.polling.request_limit.unwrap_or(DEFAULT_REQUEST_LIMIT)
    }
}
