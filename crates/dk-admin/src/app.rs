use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

/// Entity subcommands: (command name, about, supported list filters, has FPS rows).
pub const RESOURCE_COMMANDS: &[(&str, &str, &[&str], bool)] = &[
    ("cpu", "Manage CPUs", &["brand"], false),
    ("gpu", "Manage GPUs", &["brand"], true),
    ("laptop", "Manage laptops", &[], false),
    ("notification", "Manage in-app notifications", &["category"], false),
    (
        "system",
        "Manage recommended systems",
        &["resolution", "category"],
        false,
    ),
    ("motherboard", "Manage PC builder motherboards", &["brand"], false),
    ("ram", "Manage PC builder memory kits", &["brand"], false),
    ("storage", "Manage PC builder storage drives", &["brand"], false),
    ("psu", "Manage PC builder power supplies", &["brand"], false),
    ("case", "Manage PC builder cases", &["brand"], false),
    ("cooler", "Manage PC builder coolers", &["brand"], false),
];

pub fn build_cli() -> Command {
    let mut app = Command::new("dk-admin")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Administer the Donanım Kıyasla hardware comparison backend")
        .long_about("dk-admin manages the catalog (CPUs, GPUs, laptops, PC builder parts), curated content (notifications, recommended systems, rankings), push campaigns and runtime settings of the Donanım Kıyasla backend, and shows its usage and monitoring statistics.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .help("Backend base URL including /api/v1 (overrides config and environment)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true);

    for (name, about, filters, has_rows) in RESOURCE_COMMANDS {
        app = app.subcommand(resource_command(name, about, filters, *has_rows));
    }

    app.subcommand(
        Command::new("ranking")
            .about("Manage GPU and CPU rankings")
            .subcommand_required(true)
            .subcommand(ranking_target_command("gpu"))
            .subcommand(ranking_target_command("cpu")),
    )
    .subcommand(
        Command::new("push")
            .about("Push notification campaigns")
            .subcommand_required(true)
            .subcommand(
                Command::new("status")
                    .about("Show registered devices and recent campaigns")
                    .arg(json_arg()),
            )
            .subcommand(
                Command::new("send")
                    .about("Send a push notification to every registered device")
                    .arg(
                        Arg::new("title")
                            .long("title")
                            .help("Notification title")
                            .required(true),
                    )
                    .arg(
                        Arg::new("body")
                            .long("body")
                            .help("Notification body")
                            .required(true),
                    )
                    .arg(force_arg("Send without confirmation prompt")),
            ),
    )
    .subcommand(
        Command::new("settings")
            .about("Runtime settings stored by the backend")
            .subcommand_required(true)
            .subcommand(
                Command::new("list")
                    .about("List settings")
                    .arg(json_arg()),
            )
            .subcommand(
                Command::new("set")
                    .about("Change a setting")
                    .arg(Arg::new("key").help("Setting key").required(true).index(1))
                    .arg(Arg::new("value").help("New value").required(true).index(2)),
            ),
    )
    .subcommand(
        Command::new("dashboard")
            .about("Show usage, activity and revenue statistics")
            .arg(watch_arg())
            .arg(json_arg()),
    )
    .subcommand(
        Command::new("monitor")
            .about("Show API traffic statistics and backend health")
            .arg(watch_arg())
            .arg(
                Arg::new("requests")
                    .long("requests")
                    .help("List recent requests instead of the summary")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("status")
                    .long("status")
                    .help("Filter recent requests by outcome")
                    .value_parser(["all", "error", "success"])
                    .default_value("all"),
            )
            .arg(json_arg()),
    )
    .subcommand(
        Command::new("cleanup-duplicates")
            .about("Delete older device records that share a device model")
            .arg(force_arg("Skip confirmation prompt")),
    )
    .subcommand(
        Command::new("config")
            .about("Print the effective configuration (credentials redacted)"),
    )
    .subcommand(
        Command::new("completions")
            .about("Generate shell completion scripts")
            .arg(
                Arg::new("shell")
                    .help("Target shell")
                    .required(true)
                    .index(1)
                    .value_parser(value_parser!(Shell)),
            ),
    )
}

fn resource_command(
    name: &'static str,
    about: &'static str,
    filters: &[&'static str],
    has_rows: bool,
) -> Command {
    let mut list = Command::new("list")
        .about("List records (client-side search, filter and paging)")
        .arg(
            Arg::new("search")
                .long("search")
                .short('s')
                .help("Case-insensitive text search"),
        )
        .arg(
            Arg::new("page")
                .long("page")
                .short('p')
                .help("Page number (clamped to the available pages)")
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
        .arg(json_arg());
    for filter in filters {
        list = list.arg(
            Arg::new(*filter)
                .long(*filter)
                .help(format!("Only records with this {}", filter)),
        );
    }

    let mut create = Command::new("create")
        .about("Create a record from --set field=value pairs")
        .arg(set_arg());
    let mut edit = Command::new("edit")
        .about("Edit a record; unspecified fields keep their values")
        .arg(key_arg())
        .arg(set_arg());
    if has_rows {
        create = create.arg(fps_arg());
        edit = edit.arg(fps_arg());
    }

    let mut command = Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(list)
        .subcommand(create)
        .subcommand(edit)
        .subcommand(
            Command::new("delete")
                .about("Delete a record")
                .arg(key_arg())
                .arg(force_arg("Skip confirmation prompt")),
        );

    if name == "laptop" {
        command = command.subcommand(
            Command::new("options")
                .about("List the GPUs and CPUs selectable for a laptop")
                .arg(json_arg()),
        );
    }

    command
}

fn ranking_target_command(target: &'static str) -> Command {
    Command::new(target)
        .about(format!("{} rankings", target.to_uppercase()))
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("Show the ranking and the entities that can be added")
                .arg(category_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("add")
                .about("Add an entity to the ranking")
                .arg(category_arg())
                .arg(
                    Arg::new("id")
                        .long("id")
                        .help(format!("{} id to rank", target.to_uppercase()))
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("score")
                        .long("score")
                        .help("Score (must be non-zero)")
                        .required(true)
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("rank")
                        .long("rank")
                        .help("Rank (default: after the last entry)")
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .help("Short description shown next to the entry"),
                )
                .arg(
                    Arg::new("inactive")
                        .long("inactive")
                        .help("Add the entry hidden")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a ranking entry")
                .arg(category_arg())
                .arg(
                    Arg::new("id")
                        .help("Ranking entry id")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(i64)),
                )
                .arg(force_arg("Skip confirmation prompt")),
        )
        .subcommand(move_command("up", "Move an entry one place up"))
        .subcommand(move_command("down", "Move an entry one place down"))
}

fn move_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(category_arg())
        .arg(
            Arg::new("position")
                .help("Position in the list, starting at 1")
                .required(true)
                .index(1)
                .value_parser(value_parser!(usize)),
        )
}

fn category_arg() -> Arg {
    Arg::new("category")
        .long("category")
        .short('c')
        .help("Ranking category")
        .value_parser(["general", "gaming", "workstation", "productivity"])
        .default_value("general")
}

fn key_arg() -> Arg {
    Arg::new("key")
        .help("Record slug (or numeric id for laptops and notifications)")
        .required(true)
        .index(1)
}

fn set_arg() -> Arg {
    Arg::new("set")
        .long("set")
        .value_name("FIELD=VALUE")
        .help("Field value; repeat for several fields (dotted names for nested fields)")
        .action(ArgAction::Append)
}

fn fps_arg() -> Arg {
    Arg::new("fps")
        .long("fps")
        .value_name("GAME:RES=FPS,...")
        .help("FPS row, e.g. \"Fortnite:1080p=240,1440p=180,4k=90\"; repeatable")
        .action(ArgAction::Append)
}

fn force_arg(help: &'static str) -> Arg {
    Arg::new("force")
        .long("force")
        .short('f')
        .help(help)
        .action(ArgAction::SetTrue)
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

fn watch_arg() -> Arg {
    Arg::new("watch")
        .long("watch")
        .short('w')
        .help("Refresh on the configured polling interval until Ctrl+C")
        .action(ArgAction::SetTrue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "dk-admin");
        app.debug_assert();
    }

    #[test]
    fn test_every_entity_has_crud_subcommands() {
        let app = build_cli();
        for (name, _, _, _) in RESOURCE_COMMANDS {
            let command = app.find_subcommand(name).unwrap();
            for action in ["list", "create", "edit", "delete"] {
                assert!(
                    command.find_subcommand(action).is_some(),
                    "{} is missing {}",
                    name,
                    action
                );
            }
        }
    }

    #[test]
    fn test_cli_list_with_filters() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "dk-admin", "cpu", "list", "--brand", "AMD", "--search", "ryzen", "--page", "2",
            ])
            .unwrap();
        let list = matches
            .subcommand_matches("cpu")
            .and_then(|m| m.subcommand_matches("list"))
            .unwrap();
        assert_eq!(list.get_one::<String>("brand").unwrap(), "AMD");
        assert_eq!(list.get_one::<String>("search").unwrap(), "ryzen");
        assert_eq!(*list.get_one::<usize>("page").unwrap(), 2);
    }

    #[test]
    fn test_cli_rejects_unsupported_filter() {
        let result =
            build_cli().try_get_matches_from(vec!["dk-admin", "laptop", "list", "--brand", "MSI"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_repeated_set_values() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "dk-admin",
                "gpu",
                "edit",
                "rtx-4070",
                "--set",
                "vramGB=12",
                "--set",
                "benchmarks.timeSpy=17800",
                "--fps",
                "Fortnite:1080p=240",
            ])
            .unwrap();
        let edit = matches
            .subcommand_matches("gpu")
            .and_then(|m| m.subcommand_matches("edit"))
            .unwrap();
        let sets: Vec<&String> = edit.get_many::<String>("set").unwrap().collect();
        assert_eq!(sets, vec!["vramGB=12", "benchmarks.timeSpy=17800"]);
        assert_eq!(edit.get_one::<String>("key").unwrap(), "rtx-4070");
    }

    #[test]
    fn test_cli_fps_only_for_gpu() {
        let result = build_cli().try_get_matches_from(vec![
            "dk-admin",
            "cpu",
            "create",
            "--fps",
            "Fortnite:1080p=240",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_ranking_move() {
        let matches = build_cli()
            .try_get_matches_from(vec!["dk-admin", "ranking", "gpu", "up", "2", "-c", "gaming"])
            .unwrap();
        let up = matches
            .subcommand_matches("ranking")
            .and_then(|m| m.subcommand_matches("gpu"))
            .and_then(|m| m.subcommand_matches("up"))
            .unwrap();
        assert_eq!(*up.get_one::<usize>("position").unwrap(), 2);
        assert_eq!(up.get_one::<String>("category").unwrap(), "gaming");
    }

    #[test]
    fn test_cli_push_send_requires_title_and_body() {
        let result =
            build_cli().try_get_matches_from(vec!["dk-admin", "push", "send", "--title", "Hi"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_monitor_status_values() {
        let ok = build_cli().try_get_matches_from(vec![
            "dk-admin", "monitor", "--requests", "--status", "error",
        ]);
        assert!(ok.is_ok());

        let bad =
            build_cli().try_get_matches_from(vec!["dk-admin", "monitor", "--status", "broken"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "dk-admin",
                "dashboard",
                "-v",
                "--base-url",
                "http://localhost:8080/api/v1",
            ])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        assert_eq!(
            matches.get_one::<String>("base-url").unwrap(),
            "http://localhost:8080/api/v1"
        );
    }

    #[test]
    fn test_cli_completions_shell() {
        let matches = build_cli()
            .try_get_matches_from(vec!["dk-admin", "completions", "bash"])
            .unwrap();
        let sub = matches.subcommand_matches("completions").unwrap();
        assert_eq!(*sub.get_one::<Shell>("shell").unwrap(), Shell::Bash);
    }
}
