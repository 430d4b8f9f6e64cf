use chrono::Utc;
use clap::ArgMatches;
use tracing::info;

use dk_admin_core::push::{PushConsole, PushMessage, SendOutcome};
use dk_admin_core::telemetry::relative_time;

use super::{CommandResult, Context, confirm_or_force, report_failure};
use crate::table::TableFormatter;

pub async fn handle_push_command(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    let mut console = PushConsole::new();
    if let Err(e) = console.load(&ctx.client).await {
        return Err(report_failure(
            "cli.push_failed",
            "load push tokens and logs",
            e,
        ));
    }

    match matches.subcommand() {
        Some(("status", sub_matches)) => print_status(&console, sub_matches.get_flag("json")),
        Some(("send", sub_matches)) => handle_send(ctx, &mut console, sub_matches).await,
        _ => Err("Unknown push command".into()),
    }
}

async fn handle_send(
    ctx: &Context,
    console: &mut PushConsole,
    matches: &ArgMatches,
) -> CommandResult {
    let message = PushMessage {
        title: matches.get_one::<String>("title").cloned().unwrap_or_default(),
        body: matches.get_one::<String>("body").cloned().unwrap_or_default(),
    };
    let force = matches.get_flag("force");

    info!(event = "cli.push_send_started", force = force);

    match console.send(&ctx.client, &message, confirm_or_force(force)).await {
        Ok(SendOutcome::Sent(stats)) => {
            println!(
                "✅ Sent to {} devices: {} delivered, {} failed, {} invalid tokens removed",
                stats.total_devices,
                stats.success_count,
                stats.fail_count,
                stats.invalid_tokens_removed
            );
            info!(
                event = "cli.push_send_completed",
                delivered = stats.success_count,
                failed = stats.fail_count
            );
            Ok(())
        }
        Ok(SendOutcome::Declined) => {
            println!("Aborted.");
            info!(event = "cli.push_send_aborted");
            Ok(())
        }
        Err(e) => Err(report_failure(
            "cli.push_send_failed",
            "send push notification",
            e,
        )),
    }
}

fn print_status(console: &PushConsole, json_output: bool) -> CommandResult {
    if json_output {
        let output = serde_json::json!({
            "tokens": serde_json::to_value(console.tokens())?,
            "logs": serde_json::to_value(console.logs())?,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let now = Utc::now();
    println!(
        "Registered devices: {} ({} active)",
        console.tokens().len(),
        console.active_token_count()
    );

    if !console.tokens().is_empty() {
        let rows: Vec<Vec<String>> = console
            .tokens()
            .iter()
            .map(|token| {
                vec![
                    token.device_id.clone(),
                    token.platform.clone().unwrap_or_else(|| "-".to_string()),
                    token.device_model.clone().unwrap_or_else(|| "-".to_string()),
                    if token.is_active { "yes" } else { "no" }.to_string(),
                    token
                        .updated_at
                        .map(|at| relative_time(at, now))
                        .unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        TableFormatter::new(&["Device", "Platform", "Model", "Active", "Updated"], &rows)
            .print_table(&rows);
    }

    if console.logs().is_empty() {
        println!("No campaigns sent yet.");
    } else {
        println!("\nRecent campaigns:");
        let rows: Vec<Vec<String>> = console
            .logs()
            .iter()
            .map(|log| {
                vec![
                    log.title.clone(),
                    log.sent_count.to_string(),
                    log.success_count.to_string(),
                    log.fail_count.to_string(),
                    log.sent_at
                        .map(|at| relative_time(at, now))
                        .unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        TableFormatter::new(&["Title", "Sent", "Delivered", "Failed", "When"], &rows)
            .print_table(&rows);
    }

    Ok(())
}
