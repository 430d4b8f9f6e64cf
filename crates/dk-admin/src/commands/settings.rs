use clap::ArgMatches;
use tracing::info;

use dk_admin_core::settings::SettingsPanel;

use super::{CommandResult, Context, report_failure, warn_on_stale_list};
use crate::table::TableFormatter;

pub async fn handle_settings_command(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    let mut panel = SettingsPanel::new();
    if let Err(e) = panel.load(&ctx.client).await {
        return Err(report_failure("cli.settings_failed", "load settings", e));
    }

    match matches.subcommand() {
        Some(("list", sub_matches)) => print_settings(&panel, sub_matches.get_flag("json")),
        Some(("set", sub_matches)) => {
            let key = sub_matches
                .get_one::<String>("key")
                .ok_or("Setting key is required")?;
            let value = sub_matches
                .get_one::<String>("value")
                .ok_or("Setting value is required")?;

            match panel.save(&ctx.client, key, value).await {
                Ok(()) => {
                    let saved = match panel.load_error() {
                        Some(_) => value.trim(),
                        None => panel
                            .get(key)
                            .map(|item| item.value.as_str())
                            .unwrap_or(value.trim()),
                    };
                    println!("✅ {} set to {}", key, saved);
                    warn_on_stale_list(panel.load_error());
                    info!(event = "cli.settings_set_completed", key = key.as_str());
                    Ok(())
                }
                Err(e) => Err(report_failure(
                    "cli.settings_set_failed",
                    &format!("save setting '{}'", key),
                    e,
                )),
            }
        }
        _ => Err("Unknown settings command".into()),
    }
}

fn print_settings(panel: &SettingsPanel, json_output: bool) -> CommandResult {
    if json_output {
        println!("{}", serde_json::to_string_pretty(panel.items())?);
        return Ok(());
    }

    if panel.items().is_empty() {
        println!("No settings stored.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = panel
        .items()
        .iter()
        .map(|item| {
            vec![
                item.key.clone(),
                item.display_name().to_string(),
                item.value.clone(),
                if item.is_default { "default" } else { "custom" }.to_string(),
                item.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    TableFormatter::new(&["Key", "Name", "Value", "Source", "Description"], &rows)
        .print_table(&rows);
    Ok(())
}
