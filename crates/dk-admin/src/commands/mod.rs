use clap::ArgMatches;
use tracing::{error, info, warn};

use dk_admin_core::config::AdminConfig;
use dk_admin_core::errors::AdminError;
use dk_admin_core::events;
use dk_admin_core::resources::{
    CoolerResource, CpuResource, GpuResource, LaptopResource, MotherboardResource,
    NotificationResource, PcCaseResource, PsuResource, RamResource, RecommendedSystemResource,
    StorageResource,
};
use dk_admin_core::{ApiClient, RequestError};

mod completions;
mod config;
mod push;
mod ranking;
mod resource;
mod settings;
mod telemetry;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Effective configuration plus the client built from it. The admin
/// credential is read once here and never changes afterwards.
pub struct Context {
    pub config: AdminConfig,
    pub client: ApiClient,
}

impl Context {
    fn connect(base_url: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = effective_config(base_url)?;
        let client = ApiClient::from_config(&config)
            .map_err(|e| report_failure("cli.client.build_failed", "set up the API client", e))?;
        Ok(Self { config, client })
    }
}

pub fn run_command(matches: &ArgMatches) -> CommandResult {
    events::log_app_startup();

    let base_url = matches.get_one::<String>("base-url").map(String::as_str);

    let result = match matches.subcommand() {
        Some(("completions", sub_matches)) => completions::handle_completions_command(sub_matches),
        Some(("config", _)) => config::handle_config_command(base_url),
        Some((name, sub_matches)) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_backend_command(name, sub_matches, base_url))
        }
        None => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown();
    result
}

async fn run_backend_command(
    name: &str,
    matches: &ArgMatches,
    base_url: Option<&str>,
) -> CommandResult {
    let ctx = Context::connect(base_url)?;

    match name {
        "cpu" => resource::handle_resource_command::<CpuResource>(&ctx, matches).await,
        "gpu" => resource::handle_resource_command::<GpuResource>(&ctx, matches).await,
        "laptop" => match matches.subcommand() {
            Some(("options", sub_matches)) => {
                resource::handle_laptop_options_command(&ctx, sub_matches).await
            }
            _ => resource::handle_resource_command::<LaptopResource>(&ctx, matches).await,
        },
        "notification" => {
            resource::handle_resource_command::<NotificationResource>(&ctx, matches).await
        }
        "system" => {
            resource::handle_resource_command::<RecommendedSystemResource>(&ctx, matches).await
        }
        "motherboard" => {
            resource::handle_resource_command::<MotherboardResource>(&ctx, matches).await
        }
        "ram" => resource::handle_resource_command::<RamResource>(&ctx, matches).await,
        "storage" => resource::handle_resource_command::<StorageResource>(&ctx, matches).await,
        "psu" => resource::handle_resource_command::<PsuResource>(&ctx, matches).await,
        "case" => resource::handle_resource_command::<PcCaseResource>(&ctx, matches).await,
        "cooler" => resource::handle_resource_command::<CoolerResource>(&ctx, matches).await,
        "ranking" => ranking::handle_ranking_command(&ctx, matches).await,
        "push" => push::handle_push_command(&ctx, matches).await,
        "settings" => settings::handle_settings_command(&ctx, matches).await,
        "dashboard" => telemetry::handle_dashboard_command(&ctx, matches).await,
        "monitor" => telemetry::handle_monitor_command(&ctx, matches).await,
        "cleanup-duplicates" => telemetry::handle_cleanup_command(&ctx, matches).await,
        _ => {
            error!(event = "cli.command_unknown", command = name);
            Err("Unknown command".into())
        }
    }
}

const CONFIG_TIP: &str =
    "Tip: Check ~/.dk-admin/config.toml and ./.dk-admin/config.toml for errors.";

/// Configuration with the `--base-url` flag applied on top, validated.
///
/// A broken config file or an invalid value fails the command instead of
/// falling back to defaults, so a typo never retargets the default backend
/// or drops the credentials.
fn effective_config(base_url: Option<&str>) -> Result<AdminConfig, Box<dyn std::error::Error>> {
    let loaded = AdminConfig::load_merged().and_then(|mut config| {
        if let Some(url) = base_url {
            config.api.base_url = Some(url.to_string());
        }
        config.validate().map(|()| config)
    });

    match loaded {
        Ok(config) => {
            info!(event = "cli.config.loaded", base_url = config.base_url());
            Ok(config)
        }
        Err(e) => {
            let failure = report_failure("cli.config.load_failed", "load configuration", e);
            eprintln!("{}", CONFIG_TIP);
            Err(failure)
        }
    }
}

/// Print, log and box a failed operation.
fn report_failure<E: AdminError>(event: &str, action: &str, e: E) -> Box<dyn std::error::Error> {
    eprintln!("❌ Failed to {}: {}", action, e);
    error!(
        event = event,
        error = %e,
        error_code = e.error_code()
    );
    events::log_app_error(&e);
    e.into()
}

/// Warn when the list refresh after a successful write failed.
fn warn_on_stale_list(load_error: Option<&RequestError>) {
    if let Some(e) = load_error {
        eprintln!(
            "⚠️  Saved, but refreshing the list failed: {}",
            e.user_message()
        );
    }
}

/// Confirmation callback for gated operations: `--force` skips the prompt.
fn confirm_or_force(force: bool) -> impl FnOnce(&str) -> bool {
    move |prompt| force || prompt_confirmation(prompt)
}

fn prompt_confirmation(prompt: &str) -> bool {
    use std::io::{self, Write};

    print!("{} [y/N] ", prompt);
    if let Err(e) = io::stdout().flush() {
        warn!(event = "cli.confirmation.flush_failed", error = %e);
    }

    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(_) => is_confirmation_accepted(&input),
        Err(e) => {
            warn!(event = "cli.confirmation.read_failed", error = %e);
            false
        }
    }
}

/// Check if user confirmation input indicates acceptance.
/// Accepts "y" or "yes" (case-insensitive).
fn is_confirmation_accepted(input: &str) -> bool {
    let normalized = input.trim().to_lowercase();
    normalized == "y" || normalized == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_confirmation_accepted_yes() {
        assert!(is_confirmation_accepted("y"));
        assert!(is_confirmation_accepted("Y"));
        assert!(is_confirmation_accepted("yes"));
        assert!(is_confirmation_accepted("YES"));
        assert!(is_confirmation_accepted("yEs"));
    }

    #[test]
    fn test_is_confirmation_accepted_no() {
        assert!(!is_confirmation_accepted("n"));
        assert!(!is_confirmation_accepted("no"));
        assert!(!is_confirmation_accepted(""));
        assert!(!is_confirmation_accepted("yess"));
        assert!(!is_confirmation_accepted("evet"));
    }

    #[test]
    fn test_is_confirmation_accepted_with_whitespace() {
        assert!(is_confirmation_accepted("  y  "));
        assert!(is_confirmation_accepted("\tyes\n"));
        assert!(!is_confirmation_accepted("  "));
    }

    #[test]
    fn test_force_skips_prompt() {
        let confirm = confirm_or_force(true);
        assert!(confirm("Delete notification 'Maintenance'?"));
    }
}
