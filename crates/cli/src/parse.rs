//! ArgMatches → Command conversion.
//!
//! Translates clap's parsed arguments into a registry [`Command`], plus the
//! per-line caller override that pipe mode allows.

use clap::ArgMatches;
use keyreg_executor::{Command, Identity};

/// A parsed invocation: the command and, in pipe mode, who runs it.
#[derive(Debug, Clone, PartialEq)]
pub struct CliCall {
    pub command: Command,
    pub caller: Option<Identity>,
}

fn string(m: &ArgMatches, name: &str) -> Result<String, String> {
    m.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| format!("missing argument: {}", name))
}

fn identity(m: &ArgMatches, name: &str) -> Result<Identity, String> {
    string(m, name).map(Identity::from)
}

/// Convert top-level matches (with a subcommand) into a call.
pub fn matches_to_call(matches: &ArgMatches) -> Result<CliCall, String> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| "no command given".to_string())?;

    // Shell-mode subcommands don't define `--as`
    let caller = sub
        .try_get_one::<String>("as")
        .ok()
        .flatten()
        .map(|s| Identity::from(s.as_str()));

    Ok(CliCall {
        command: subcommand_to_command(name, sub)?,
        caller,
    })
}

fn subcommand_to_command(name: &str, m: &ArgMatches) -> Result<Command, String> {
    let cmd = match name {
        "create" => Command::CreateEntry {
            key: string(m, "key")?,
            value: string(m, "value")?,
        },
        "get" => Command::GetEntry {
            key: string(m, "key")?,
        },
        "update" => Command::UpdateEntry {
            key: string(m, "key")?,
            value: string(m, "value")?,
        },
        "delete" => Command::DeleteEntry {
            key: string(m, "key")?,
        },
        "transfer" => Command::TransferEntry {
            key: string(m, "key")?,
            new_owner: identity(m, "new-owner")?,
        },
        "pause" => Command::SetPaused { paused: true },
        "unpause" => Command::SetPaused { paused: false },
        "add-moderator" => Command::AddModerator {
            identity: identity(m, "identity")?,
        },
        "remove-moderator" => Command::RemoveModerator {
            identity: identity(m, "identity")?,
        },
        "freeze" => Command::SetKeyFrozen {
            key: string(m, "key")?,
            frozen: true,
        },
        "unfreeze" => Command::SetKeyFrozen {
            key: string(m, "key")?,
            frozen: false,
        },
        "count" => Command::GetKeyCount {
            owner: identity(m, "owner")?,
        },
        "key-at" => Command::GetKeyByOwner {
            owner: identity(m, "owner")?,
            index: m
                .get_one::<u64>("index")
                .copied()
                .ok_or_else(|| "missing argument: index".to_string())?,
        },
        "keys" => Command::KeysByOwner {
            owner: identity(m, "owner")?,
        },
        "is-moderator" => Command::IsModerator {
            identity: identity(m, "identity")?,
        },
        "is-paused" => Command::IsPaused,
        "concat" => Command::ConcatKeys {
            a: string(m, "a")?,
            b: string(m, "b")?,
        },
        "ping" => Command::Ping,
        "info" => Command::Info,
        "flush" => Command::Flush,
        "checkpoint" => Command::Checkpoint,
        other => return Err(format!("unknown command: {}", other)),
    };
    Ok(cmd)
}
