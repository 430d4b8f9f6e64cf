//! list/create/edit/delete for every catalog and content entity.

use clap::ArgMatches;
use tracing::info;

use dk_admin_core::form::FormController;
use dk_admin_core::resources::fetch_laptop_form_options;
use dk_admin_core::{DeleteOutcome, Resource, ResourceKey, ResourcePage};

use super::{CommandResult, Context, confirm_or_force, report_failure, warn_on_stale_list};
use crate::table::TableFormatter;

pub async fn handle_resource_command<R: Resource>(
    ctx: &Context,
    matches: &ArgMatches,
) -> CommandResult {
    match matches.subcommand() {
        Some(("list", sub_matches)) => handle_list::<R>(ctx, sub_matches).await,
        Some(("create", sub_matches)) => handle_create::<R>(ctx, sub_matches).await,
        Some(("edit", sub_matches)) => handle_edit::<R>(ctx, sub_matches).await,
        Some(("delete", sub_matches)) => handle_delete::<R>(ctx, sub_matches).await,
        _ => Err(format!("Unknown {} command", R::NAME).into()),
    }
}

async fn handle_list<R: Resource>(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    let json_output = matches.get_flag("json");
    info!(
        event = "cli.list_started",
        resource = R::NAME,
        json_output = json_output
    );

    let mut page = ResourcePage::<R>::from_config(&ctx.config);
    for key in R::FILTERS {
        if let Some(value) = matches.try_get_one::<String>(key.as_str()).ok().flatten() {
            page.store_mut().set_filter(*key, Some(value));
        }
    }
    if let Some(search) = matches.get_one::<String>("search") {
        page.store_mut().set_search_text(search);
    }

    if let Err(e) = page.load(&ctx.client).await {
        return Err(report_failure(
            "cli.list_failed",
            &format!("list {} records", R::NAME),
            e,
        ));
    }

    let requested = matches.get_one::<usize>("page").copied().unwrap_or(1);
    let store = page.store_mut();
    store.set_page(requested);

    let visible = store.visible();
    if json_output {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ListPage<'a, T> {
            page: usize,
            page_count: usize,
            total: usize,
            items: &'a [&'a T],
        }

        let output = ListPage {
            page: store.page(),
            page_count: store.page_count(),
            total: store.filtered_count(),
            items: &visible,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if visible.is_empty() {
        println!("No {} records found.", R::NAME);
    } else {
        let rows: Vec<Vec<String>> = visible.iter().map(|record| R::cells(record)).collect();
        TableFormatter::new(R::columns(), &rows).print_table(&rows);
        println!(
            "Page {} of {} ({} matching, {} loaded)",
            store.page(),
            store.page_count(),
            store.filtered_count(),
            store.items().len()
        );
    }

    info!(
        event = "cli.list_completed",
        resource = R::NAME,
        count = visible.len()
    );
    Ok(())
}

async fn handle_create<R: Resource>(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    info!(event = "cli.create_started", resource = R::NAME);

    let mut page = ResourcePage::<R>::from_config(&ctx.config);
    apply_edits(page.form_mut(), matches)?;

    match page.submit(&ctx.client).await {
        Ok(_) => {
            println!("✅ {} created", R::NAME);
            warn_on_stale_list(page.store().load_error());
            info!(event = "cli.create_completed", resource = R::NAME);
            Ok(())
        }
        Err(e) => Err(report_failure(
            "cli.create_failed",
            &format!("create {}", R::NAME),
            e,
        )),
    }
}

async fn handle_edit<R: Resource>(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    let key = parse_key::<R>(matches)?;
    info!(event = "cli.edit_started", resource = R::NAME, key = %key);

    let mut page = ResourcePage::<R>::from_config(&ctx.config);
    let action = format!("edit {} '{}'", R::NAME, key);
    if let Err(e) = page.load(&ctx.client).await {
        return Err(report_failure("cli.edit_failed", &action, e));
    }
    if let Err(e) = page.edit(&key) {
        return Err(report_failure("cli.edit_failed", &action, e));
    }

    if apply_edits(page.form_mut(), matches)? == 0 {
        return Err("Nothing to change: pass at least one --set or --fps".into());
    }

    match page.submit(&ctx.client).await {
        Ok(_) => {
            println!("✅ {} '{}' updated", R::NAME, key);
            warn_on_stale_list(page.store().load_error());
            info!(event = "cli.edit_completed", resource = R::NAME, key = %key);
            Ok(())
        }
        Err(e) => Err(report_failure("cli.edit_failed", &action, e)),
    }
}

async fn handle_delete<R: Resource>(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    let key = parse_key::<R>(matches)?;
    let force = matches.get_flag("force");
    info!(
        event = "cli.delete_started",
        resource = R::NAME,
        key = %key,
        force = force
    );

    let mut page = ResourcePage::<R>::from_config(&ctx.config);
    let action = format!("delete {} '{}'", R::NAME, key);
    if let Err(e) = page.load(&ctx.client).await {
        return Err(report_failure("cli.delete_failed", &action, e));
    }

    match page.delete(&ctx.client, &key, confirm_or_force(force)).await {
        Ok(DeleteOutcome::Deleted) => {
            println!("✅ {} '{}' deleted", R::NAME, key);
            warn_on_stale_list(page.store().load_error());
            info!(event = "cli.delete_completed", resource = R::NAME, key = %key);
            Ok(())
        }
        Ok(DeleteOutcome::Declined) => {
            println!("Aborted.");
            info!(event = "cli.delete_aborted", resource = R::NAME, key = %key);
            Ok(())
        }
        Err(e) => Err(report_failure("cli.delete_failed", &action, e)),
    }
}

pub async fn handle_laptop_options_command(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    let options = match fetch_laptop_form_options(&ctx.client).await {
        Ok(options) => options,
        Err(e) => {
            return Err(report_failure(
                "cli.laptop_options_failed",
                "load laptop form options",
                e,
            ));
        }
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    for (title, refs) in [("GPUs", &options.gpus), ("CPUs", &options.cpus)] {
        println!("{}:", title);
        let rows: Vec<Vec<String>> = refs
            .iter()
            .map(|r| vec![r.id.to_string(), r.model.clone()])
            .collect();
        TableFormatter::new(&["Id", "Model"], &rows).print_table(&rows);
    }
    Ok(())
}

fn parse_key<R: Resource>(matches: &ArgMatches) -> Result<ResourceKey, Box<dyn std::error::Error>> {
    let raw = matches
        .get_one::<String>("key")
        .ok_or("Key argument is required")?;
    ResourceKey::parse(R::KEY_KIND, raw).map_err(|e| {
        eprintln!("❌ {}", e);
        e.into()
    })
}

/// Apply `--set` and `--fps` values to the draft. Returns how many were
/// applied.
fn apply_edits<R: Resource>(
    form: &mut FormController<R>,
    matches: &ArgMatches,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut applied = 0;

    if let Some(values) = matches.get_many::<String>("set") {
        for raw in values {
            let (field, value) = parse_assignment(raw)?;
            if let Err(e) = form.update_field(field, value) {
                return Err(report_failure(
                    "cli.form.field_rejected",
                    &format!("set '{}'", field),
                    e,
                ));
            }
            applied += 1;
        }
    }

    if let Some(rows) = matches.try_get_many::<String>("fps").ok().flatten() {
        for raw in rows {
            let (game, values) = parse_fps_row(raw)?;
            let pairs: Vec<(&str, &str)> = values
                .iter()
                .map(|(column, value)| (column.as_str(), value.as_str()))
                .collect();
            if let Err(e) = form.upsert_row(&game, &pairs) {
                return Err(report_failure(
                    "cli.form.row_rejected",
                    &format!("set FPS for '{}'", game),
                    e,
                ));
            }
            applied += 1;
        }
    }

    Ok(applied)
}

fn parse_assignment(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => Err(format!("Invalid --set '{}': expected FIELD=VALUE", raw)),
    }
}

/// `"Red Dead Redemption 2:1080p=90,4k=40"` → game name and column values.
fn parse_fps_row(raw: &str) -> Result<(String, Vec<(String, String)>), String> {
    let invalid = || format!("Invalid --fps '{}': expected GAME:RES=FPS[,RES=FPS...]", raw);

    let (game, values) = raw.rsplit_once(':').ok_or_else(invalid)?;
    let game = game.trim();
    if game.is_empty() {
        return Err(invalid());
    }

    let mut columns = Vec::new();
    for pair in values.split(',').filter(|p| !p.trim().is_empty()) {
        let (column, value) = pair.split_once('=').ok_or_else(invalid)?;
        columns.push((column.trim().to_string(), value.trim().to_string()));
    }
    if columns.is_empty() {
        return Err(invalid());
    }

    Ok((game.to_string(), columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("vramGB=12"), Ok(("vramGB", "12")));
        assert_eq!(
            parse_assignment("benchmarks.timeSpy=17800"),
            Ok(("benchmarks.timeSpy", "17800"))
        );
        assert_eq!(parse_assignment("model=A=B"), Ok(("model", "A=B")));
        assert_eq!(parse_assignment("description="), Ok(("description", "")));
        assert!(parse_assignment("vramGB").is_err());
        assert!(parse_assignment("=12").is_err());
    }

    #[test]
    fn test_parse_fps_row() {
        let (game, columns) = parse_fps_row("Call of Duty: Warzone:1080p=140, 4k=60").unwrap();
        assert_eq!(game, "Call of Duty: Warzone");
        assert_eq!(
            columns,
            vec![
                ("1080p".to_string(), "140".to_string()),
                ("4k".to_string(), "60".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_fps_row_rejects_malformed() {
        assert!(parse_fps_row("Fortnite").is_err());
        assert!(parse_fps_row(":1080p=90").is_err());
        assert!(parse_fps_row("Fortnite:").is_err());
        assert!(parse_fps_row("Fortnite:1080p").is_err());
    }
}
