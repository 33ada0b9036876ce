//! Clap command tree definition.
//!
//! Builds the `clap::Command` tree used by both shell mode (directly)
//! and pipe mode (via `try_get_matches_from`).

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("keyreg")
        .about("Access-controlled key registry")
        .subcommand_required(false)
        .arg(
            Arg::new("db")
                .long("db")
                .help("Registry data directory (default: .keyreg)")
                .global(true),
        )
        .arg(
            Arg::new("cache")
                .long("cache")
                .help("Ephemeral in-memory registry, no disk")
                .action(ArgAction::SetTrue)
                .conflicts_with("db")
                .global(true),
        )
        .arg(
            Arg::new("admin")
                .long("admin")
                .help("Admin identity; required to create a new registry")
                .global(true),
        )
        .arg(
            Arg::new("durability")
                .long("durability")
                .help("Durability for a new registry: cache, standard or always")
                .global(true),
        )
        .arg(
            Arg::new("caller")
                .long("caller")
                .help("Identity commands run as (default: anonymous)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .conflicts_with("raw")
                .global(true),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Raw output mode (no type prefixes, no quotes)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("read-only")
                .long("read-only")
                .help("Reject every command that would change the registry")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommands(registry_subcommands())
}

/// Build the command tree for pipe mode.
///
/// Each line is a bare subcommand; `--as <id>` overrides the caller for
/// that line only.
pub fn build_pipe_cmd() -> Command {
    Command::new("pipe")
        .multicall(true)
        .subcommand_required(true)
        .subcommands(registry_subcommands().into_iter().map(|cmd| {
            cmd.arg(
                Arg::new("as")
                    .long("as")
                    .help("Run this line as another identity"),
            )
        }))
}

fn key_arg() -> Arg {
    Arg::new("key").required(true).help("Entry key")
}

fn value_arg() -> Arg {
    Arg::new("value").required(true).help("Entry value")
}

fn identity_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).required(true).help(help)
}

fn registry_subcommands() -> Vec<Command> {
    vec![
        // Entries
        Command::new("create")
            .about("Register a new key owned by the caller")
            .arg(key_arg())
            .arg(value_arg()),
        Command::new("get").about("Show an entry").arg(key_arg()),
        Command::new("update")
            .about("Replace the value of an owned entry")
            .arg(key_arg())
            .arg(value_arg()),
        Command::new("delete")
            .about("Remove an owned entry")
            .arg(key_arg()),
        Command::new("transfer")
            .about("Hand an owned entry to another identity")
            .arg(key_arg())
            .arg(identity_arg("new-owner", "Identity receiving the entry")),
        // Administration
        Command::new("pause").about("Stop new entries from being created (admin)"),
        Command::new("unpause").about("Allow entry creation again (admin)"),
        Command::new("add-moderator")
            .about("Grant freeze authority (admin)")
            .arg(identity_arg("identity", "Identity to promote")),
        Command::new("remove-moderator")
            .about("Revoke freeze authority (admin)")
            .arg(identity_arg("identity", "Identity to demote")),
        // Moderation
        Command::new("freeze")
            .about("Block changes to an entry (moderator)")
            .arg(key_arg()),
        Command::new("unfreeze")
            .about("Lift a freeze (moderator)")
            .arg(key_arg()),
        // Queries
        Command::new("count")
            .about("Number of keys an identity owns")
            .arg(identity_arg("owner", "Owner identity")),
        Command::new("key-at")
            .about("Key at a position in an owner's list")
            .arg(identity_arg("owner", "Owner identity"))
            .arg(
                Arg::new("index")
                    .required(true)
                    .value_parser(value_parser!(u64))
                    .help("Zero-based position"),
            ),
        Command::new("keys")
            .about("All keys an identity owns, in index order")
            .arg(identity_arg("owner", "Owner identity")),
        Command::new("is-moderator")
            .about("Whether an identity is a moderator")
            .arg(identity_arg("identity", "Identity to check")),
        Command::new("is-paused").about("Whether entry creation is paused"),
        Command::new("concat")
            .about("Join two fragments into one key")
            .arg(Arg::new("a").required(true))
            .arg(Arg::new("b").required(true)),
        // Registry
        Command::new("ping").about("Check the registry is reachable"),
        Command::new("info").about("Registry summary"),
        Command::new("flush").about("Force pending log records to disk"),
        Command::new("checkpoint").about("Snapshot state and truncate the log"),
    ]
}
