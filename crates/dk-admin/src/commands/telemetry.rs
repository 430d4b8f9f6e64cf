//! dashboard, monitor and cleanup-duplicates.

use std::future::Future;

use chrono::Utc;
use clap::ArgMatches;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use dk_admin_core::telemetry::{
    CleanupOutcome, DashboardSnapshot, MonitoringSnapshot, RecentRequest, RequestStatusFilter,
    cleanup_duplicates, fetch_dashboard, fetch_monitoring, format_megabytes, format_uptime,
    recent_requests, relative_time,
};
use dk_admin_core::{Poller, RequestError};

use super::{CommandResult, Context, confirm_or_force, report_failure};
use crate::table::{TableFormatter, truncate};

pub async fn handle_dashboard_command(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    let json_output = matches.get_flag("json");
    info!(
        event = "cli.dashboard_started",
        watch = matches.get_flag("watch")
    );

    let client = &ctx.client;
    if matches.get_flag("watch") {
        return watch(
            ctx,
            "dashboard",
            move || fetch_dashboard(client),
            |snapshot| render_dashboard(snapshot, json_output),
        )
        .await;
    }

    match fetch_dashboard(client).await {
        Ok(snapshot) => render_dashboard(&snapshot, json_output),
        Err(e) => Err(report_failure(
            "cli.dashboard_failed",
            "load dashboard statistics",
            e,
        )),
    }
}

pub async fn handle_monitor_command(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    let json_output = matches.get_flag("json");
    let watch_mode = matches.get_flag("watch");
    let client = &ctx.client;

    if matches.get_flag("requests") {
        let status: RequestStatusFilter = match matches.get_one::<String>("status") {
            Some(raw) => raw.parse()?,
            None => RequestStatusFilter::default(),
        };
        let limit = ctx.config.request_limit();
        info!(
            event = "cli.monitor_requests_started",
            status = status.as_param(),
            limit = limit
        );

        if watch_mode {
            return watch(
                ctx,
                "monitor-requests",
                move || recent_requests(client, limit, status),
                |requests| render_requests(requests, json_output),
            )
            .await;
        }
        return match recent_requests(client, limit, status).await {
            Ok(requests) => render_requests(&requests, json_output),
            Err(e) => Err(report_failure(
                "cli.monitor_failed",
                "load recent requests",
                e,
            )),
        };
    }

    info!(event = "cli.monitor_started", watch = watch_mode);
    if watch_mode {
        return watch(
            ctx,
            "monitor",
            move || fetch_monitoring(client),
            |snapshot| render_monitoring(snapshot, json_output),
        )
        .await;
    }

    match fetch_monitoring(client).await {
        Ok(snapshot) => render_monitoring(&snapshot, json_output),
        Err(e) => Err(report_failure(
            "cli.monitor_failed",
            "load monitoring statistics",
            e,
        )),
    }
}

pub async fn handle_cleanup_command(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    let force = matches.get_flag("force");
    info!(event = "cli.cleanup_started", force = force);

    match cleanup_duplicates(&ctx.client, confirm_or_force(force)).await {
        Ok(CleanupOutcome::Cleaned { deleted, message }) => {
            println!("✅ {}", message);
            info!(event = "cli.cleanup_completed", deleted = deleted);
            Ok(())
        }
        Ok(CleanupOutcome::Declined) => {
            println!("Aborted.");
            info!(event = "cli.cleanup_aborted");
            Ok(())
        }
        Err(e) => Err(report_failure(
            "cli.cleanup_failed",
            "clean up duplicate devices",
            e,
        )),
    }
}

/// Redraw `render` on every successful poll until Ctrl+C.
async fn watch<F, Fut, T, R>(ctx: &Context, name: &'static str, fetch: F, mut render: R) -> CommandResult
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RequestError>>,
    R: FnMut(&T) -> CommandResult,
{
    let interval = ctx.config.poll_interval();
    let poller = Poller::new(name, interval);
    cancel_on_ctrl_c(poller.cancel_token());

    let summary = poller
        .run(fetch, |value| {
            print!("\x1B[2J\x1B[1;1H");
            if let Err(e) = render(&value) {
                warn!(event = "cli.watch.render_failed", error = %e);
            }
            println!(
                "\nRefreshing every {}s. Press Ctrl+C to exit.",
                interval.as_secs()
            );
        })
        .await;

    println!(
        "\nStopped after {} refreshes ({} failed).",
        summary.ticks, summary.failures
    );
    info!(
        event = "cli.watch_completed",
        poller = name,
        ticks = summary.ticks,
        failures = summary.failures
    );
    Ok(())
}

fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(event = "cli.watch.interrupted");
                cancel.cancel();
            }
            Err(e) => warn!(event = "cli.watch.signal_failed", error = %e),
        }
    });
}

fn render_dashboard(snapshot: &DashboardSnapshot, json_output: bool) -> CommandResult {
    if json_output {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    let stats = &snapshot.stats;
    println!(
        "Downloads: {}   Live: {}   Daily: {}   Weekly: {}   Monthly: {}",
        stats.total_downloads,
        stats.live_active,
        stats.daily_active,
        stats.weekly_active,
        stats.monthly_active
    );

    let platforms: Vec<Vec<String>> = snapshot
        .extended
        .platform_breakdown
        .iter()
        .map(|p| {
            vec![
                p.platform.clone(),
                p.count.to_string(),
                format!("{:.1}%", p.percentage),
            ]
        })
        .collect();
    if !platforms.is_empty() {
        println!("\nPlatforms:");
        TableFormatter::new(&["Platform", "Devices", "Share"], &platforms).print_table(&platforms);
    }

    let daily: Vec<Vec<String>> = snapshot
        .extended
        .daily
        .iter()
        .map(|d| {
            vec![
                d.label.clone(),
                d.active_users.to_string(),
                d.new_users.to_string(),
            ]
        })
        .collect();
    if !daily.is_empty() {
        println!("\nDaily activity:");
        TableFormatter::new(&["Day", "Active", "New"], &daily).print_table(&daily);
    }

    let revenue = &snapshot.revenue;
    println!(
        "\nEstimated revenue: daily {:.2} (USD {:.2}), weekly {:.2}, monthly {:.2} (USD {:.2})",
        revenue.estimated_revenue.daily,
        revenue.estimated_revenue.daily_usd,
        revenue.estimated_revenue.weekly,
        revenue.estimated_revenue.monthly,
        revenue.estimated_revenue.monthly_usd
    );
    println!(
        "Ad impressions: daily {} banner / {} interstitial, weekly {} banner / {} interstitial",
        revenue.impressions.daily_banner,
        revenue.impressions.daily_interstitial,
        revenue.impressions.weekly_banner,
        revenue.impressions.weekly_interstitial
    );
    if !revenue.disclaimer.is_empty() {
        println!("{}", revenue.disclaimer);
    }

    if !snapshot.devices.is_empty() {
        let now = Utc::now();
        let rows: Vec<Vec<String>> = snapshot
            .devices
            .iter()
            .map(|d| {
                vec![
                    truncate(&d.device_id, 16).trim_end().to_string(),
                    d.platform.clone().unwrap_or_else(|| "-".to_string()),
                    d.device_model.clone().unwrap_or_else(|| "-".to_string()),
                    d.app_version.clone().unwrap_or_else(|| "-".to_string()),
                    d.last_active_at
                        .map(|at| relative_time(at, now))
                        .unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        println!("\nRecent devices:");
        TableFormatter::new(&["Device", "Platform", "Model", "Version", "Last Active"], &rows)
            .print_table(&rows);
    }

    Ok(())
}

fn render_monitoring(snapshot: &MonitoringSnapshot, json_output: bool) -> CommandResult {
    if json_output {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    let health = &snapshot.health;
    println!(
        "Status: {}   Uptime: {}   Database: {} ({:.0} ms)",
        health.status,
        format_uptime(health.uptime),
        health.database.status,
        health.database.response_time
    );
    println!(
        "Memory: heap {} / {}, rss {}",
        format_megabytes(health.memory.heap_used),
        format_megabytes(health.memory.heap_total),
        format_megabytes(health.memory.rss)
    );

    let stats = &snapshot.stats;
    println!(
        "\nRequests: {} total, {} today, {} in 24h, {} last hour, {:.1}/min",
        stats.overview.total_requests,
        stats.overview.today_requests,
        stats.overview.last_24_hours_requests,
        stats.overview.last_hour_requests,
        stats.overview.requests_per_minute
    );
    println!(
        "Errors (24h): {} ({} server, {} client), rate {}%",
        stats.errors.total_errors_24h,
        stats.errors.server_errors,
        stats.errors.client_errors,
        stats.errors.error_rate
    );
    println!(
        "Average response: {:.0} ms   Rate limited (24h): {}",
        stats.performance.avg_response_time, stats.rate_limit.exceeded_24h
    );

    let top: Vec<Vec<String>> = stats
        .top_endpoints
        .iter()
        .map(|e| vec![e.path.clone(), e.count.to_string()])
        .collect();
    if !top.is_empty() {
        println!("\nTop endpoints:");
        TableFormatter::new(&["Path", "Requests"], &top).print_table(&top);
    }

    let slowest: Vec<Vec<String>> = stats
        .performance
        .slowest_endpoints
        .iter()
        .map(|e| {
            vec![
                e.path.clone(),
                format!("{:.0} ms", e.avg_time),
                e.count.to_string(),
            ]
        })
        .collect();
    if !slowest.is_empty() {
        println!("\nSlowest endpoints:");
        TableFormatter::new(&["Path", "Average", "Requests"], &slowest).print_table(&slowest);
    }

    let failing: Vec<Vec<String>> = stats
        .error_endpoints
        .iter()
        .map(|e| vec![e.path.clone(), e.count.to_string()])
        .collect();
    if !failing.is_empty() {
        println!("\nFailing endpoints:");
        TableFormatter::new(&["Path", "Errors"], &failing).print_table(&failing);
    }

    let trend: Vec<Vec<String>> = stats
        .daily_trend
        .iter()
        .map(|d| {
            vec![
                d.date.clone(),
                d.count.to_string(),
                format!("{:.0} ms", d.avg_response_time),
                d.error_count.to_string(),
            ]
        })
        .collect();
    if !trend.is_empty() {
        println!("\nDaily trend:");
        TableFormatter::new(&["Date", "Requests", "Average", "Errors"], &trend)
            .print_table(&trend);
    }

    Ok(())
}

fn render_requests(requests: &[RecentRequest], json_output: bool) -> CommandResult {
    if json_output {
        println!("{}", serde_json::to_string_pretty(requests)?);
        return Ok(());
    }

    if requests.is_empty() {
        println!("No requests recorded.");
        return Ok(());
    }

    let now = Utc::now();
    let rows: Vec<Vec<String>> = requests
        .iter()
        .map(|r| {
            vec![
                r.created_at
                    .map(|at| relative_time(at, now))
                    .unwrap_or_else(|| "-".to_string()),
                r.method.clone(),
                r.path.clone(),
                r.status_code.to_string(),
                format!("{:.0} ms", r.response_time),
                r.ip.clone().unwrap_or_else(|| "-".to_string()),
                r.error.clone().unwrap_or_default(),
            ]
        })
        .collect();
    TableFormatter::new(
        &["When", "Method", "Path", "Status", "Time", "IP", "Error"],
        &rows,
    )
    .print_table(&rows);
    Ok(())
}
