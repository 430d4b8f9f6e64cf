use clap::ArgMatches;
use tracing::info;

use dk_admin_core::DeleteOutcome;
use dk_admin_core::rankings::{
    NewRanking, RankedItem, RankingBoard, RankingCategory, RankingEntry, RankingTarget,
};

use super::{CommandResult, Context, confirm_or_force, report_failure, warn_on_stale_list};
use crate::table::TableFormatter;

pub async fn handle_ranking_command(ctx: &Context, matches: &ArgMatches) -> CommandResult {
    let (target_name, target_matches) = matches
        .subcommand()
        .ok_or("Ranking target is required (gpu or cpu)")?;
    let target: RankingTarget = target_name.parse()?;
    let (action, action_matches) = target_matches
        .subcommand()
        .ok_or("Ranking action is required")?;
    let category: RankingCategory = match action_matches.get_one::<String>("category") {
        Some(raw) => raw.parse()?,
        None => RankingCategory::default(),
    };

    info!(
        event = "cli.ranking_started",
        target = %target,
        category = %category,
        action = action
    );

    let mut board = RankingBoard::new(target, category);
    if let Err(e) = board.load(&ctx.client).await {
        return Err(report_failure(
            "cli.ranking_failed",
            &format!("load {} {} ranking", category, target),
            e,
        ));
    }

    match action {
        "list" => print_board(&board, action_matches.get_flag("json")),
        "add" => handle_add(ctx, &mut board, action_matches).await,
        "remove" => handle_remove(ctx, &mut board, action_matches).await,
        "up" | "down" => handle_move(ctx, &mut board, action, action_matches).await,
        _ => Err(format!("Unknown ranking action '{}'", action).into()),
    }
}

async fn handle_add(ctx: &Context, board: &mut RankingBoard, matches: &ArgMatches) -> CommandResult {
    let new = NewRanking {
        entity_id: matches.get_one::<i64>("id").copied().unwrap_or_default(),
        score: matches.get_one::<f64>("score").copied().unwrap_or_default(),
        rank: matches.get_one::<i64>("rank").copied(),
        description: matches.get_one::<String>("description").cloned(),
        is_active: !matches.get_flag("inactive"),
    };
    let entity_id = new.entity_id;

    match board.add(&ctx.client, new).await {
        Ok(()) => {
            println!(
                "✅ Added {} #{} to the {} ranking",
                board.target(),
                entity_id,
                board.category()
            );
            info!(event = "cli.ranking_add_completed", entity_id = entity_id);
            warn_on_stale_list(board.load_error());
            print_board(board, false)
        }
        Err(e) => Err(report_failure(
            "cli.ranking_add_failed",
            &format!("add {} #{}", board.target(), entity_id),
            e,
        )),
    }
}

async fn handle_remove(
    ctx: &Context,
    board: &mut RankingBoard,
    matches: &ArgMatches,
) -> CommandResult {
    let id = *matches
        .get_one::<i64>("id")
        .ok_or("Ranking entry id is required")?;
    let force = matches.get_flag("force");

    match board.remove(&ctx.client, id, confirm_or_force(force)).await {
        Ok(DeleteOutcome::Deleted) => {
            println!("✅ Ranking entry {} removed", id);
            warn_on_stale_list(board.load_error());
            info!(event = "cli.ranking_remove_completed", id = id);
            Ok(())
        }
        Ok(DeleteOutcome::Declined) => {
            println!("Aborted.");
            info!(event = "cli.ranking_remove_aborted", id = id);
            Ok(())
        }
        Err(e) => Err(report_failure(
            "cli.ranking_remove_failed",
            &format!("remove ranking entry {}", id),
            e,
        )),
    }
}

async fn handle_move(
    ctx: &Context,
    board: &mut RankingBoard,
    direction: &str,
    matches: &ArgMatches,
) -> CommandResult {
    let position = *matches
        .get_one::<usize>("position")
        .ok_or("Position is required")?;
    let index = position
        .checked_sub(1)
        .ok_or("Positions start at 1")?;
    let label = board
        .entries()
        .get(index)
        .map(|entry| entry.label())
        .unwrap_or_default();

    let moved = if direction == "up" {
        board.move_up(&ctx.client, index).await
    } else {
        board.move_down(&ctx.client, index).await
    };

    match moved {
        Ok(true) => {
            println!("✅ Moved '{}' {}", label, direction);
            warn_on_stale_list(board.load_error());
            info!(
                event = "cli.ranking_move_completed",
                direction = direction,
                index = index
            );
            print_board(board, false)
        }
        Ok(false) => {
            println!("'{}' is already at the {}; nothing to do.", label, edge(direction));
            Ok(())
        }
        Err(e) => Err(report_failure(
            "cli.ranking_move_failed",
            &format!("move position {} {}", position, direction),
            e,
        )),
    }
}

fn edge(direction: &str) -> &'static str {
    if direction == "up" { "top" } else { "bottom" }
}

fn print_board(board: &RankingBoard, json_output: bool) -> CommandResult {
    if json_output {
        #[derive(serde::Serialize)]
        struct BoardOutput<'a> {
            target: &'a str,
            category: &'a str,
            entries: &'a [RankingEntry],
            available: &'a [RankedItem],
        }

        let output = BoardOutput {
            target: board.target().as_str(),
            category: board.category().as_str(),
            entries: board.entries(),
            available: board.available(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if board.entries().is_empty() {
        println!(
            "The {} {} ranking is empty.",
            board.category(),
            board.target()
        );
    } else {
        let rows: Vec<Vec<String>> = board
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                vec![
                    (i + 1).to_string(),
                    entry.rank.to_string(),
                    entry.label(),
                    format!("{:.1}", entry.score),
                    if entry.is_active { "yes" } else { "no" }.to_string(),
                    entry.id.to_string(),
                ]
            })
            .collect();
        TableFormatter::new(&["#", "Rank", "Item", "Score", "Active", "Entry Id"], &rows)
            .print_table(&rows);
    }

    if !board.available().is_empty() {
        println!("\nAvailable to add:");
        let rows: Vec<Vec<String>> = board
            .available()
            .iter()
            .map(|item| {
                vec![
                    item.id.to_string(),
                    format!("{} {}", item.brand, item.model),
                ]
            })
            .collect();
        TableFormatter::new(&["Id", "Item"], &rows).print_table(&rows);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_names() {
        assert_eq!(edge("up"), "top");
        assert_eq!(edge("down"), "bottom");
    }
}
