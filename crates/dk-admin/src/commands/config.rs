use dk_admin_core::config::{AdminConfig, ApiConfig, ListConfig, PollingConfig};

use super::{CommandResult, effective_config};

const REDACTED: &str = "<redacted>";

pub fn handle_config_command(base_url: Option<&str>) -> CommandResult {
    let config = effective_config(base_url)?;
    print!("{}", toml::to_string(&redacted_effective(&config))?);

    if config.admin_token().is_none() {
        eprintln!("⚠️  No admin token configured (set DK_ADMIN_TOKEN); writes will be rejected.");
    }
    Ok(())
}

/// Every setting with defaults filled in and credentials masked.
fn redacted_effective(config: &AdminConfig) -> AdminConfig {
    let redact = |token: Option<&str>| token.map(|_| REDACTED.to_string());

    AdminConfig {
        api: ApiConfig {
            base_url: Some(config.base_url().to_string()),
            admin_token: redact(config.admin_token()),
            session_token: redact(config.session_token()),
        },
        list: ListConfig {
            page_size: Some(config.page_size()),
            fetch_limit: Some(config.fetch_limit()),
        },
        polling: PollingConfig {
            interval_secs: Some(config.poll_interval().as_secs()),
            request_limit: Some(config.request_limit()),
        },
    }
}
