//! Keyreg CLI: host binary for the keyreg registry.
//!
//! Two modes:
//! - **Shell mode**: `keyreg [flags] COMMAND`: run a single command and exit
//! - **Pipe mode**: `cat setup.txt | keyreg [flags]`: read commands line by line from stdin
//!
//! Every command runs as the `--caller` identity. A new registry needs
//! `--admin`; an existing one is reopened from its data directory.

mod commands;
mod format;
mod parse;

use std::io::{self, BufRead, IsTerminal};
use std::path::Path;
use std::process;

use keyreg_executor::{
    AccessMode, Executor, Identity, Registry, RegistryConfig, Session, CONFIG_FILE_NAME,
};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use commands::{build_cli, build_pipe_cmd};
use format::{format_error, format_output, OutputMode};
use parse::{matches_to_call, CliCall};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    process::exit(run());
}

/// Run the CLI and return the exit code.
///
/// The registry is dropped before this returns, so its final flush runs and
/// the background flush thread is joined before the process exits.
fn run() -> i32 {
    let matches = build_cli().get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else if matches.get_flag("raw") {
        OutputMode::Raw
    } else {
        OutputMode::Human
    };

    let registry = match open_registry(&matches) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    let access_mode = if matches.get_flag("read-only") {
        AccessMode::ReadOnly
    } else {
        AccessMode::ReadWrite
    };
    let caller = matches
        .get_one::<String>("caller")
        .map(|s| s.as_str())
        .unwrap_or("anonymous");
    let session = Session::with_executor(Executor::new_with_mode(registry, access_mode), caller);

    if matches.subcommand().is_some() {
        run_shell_mode(&matches, &session, output_mode)
    } else if io::stdin().is_terminal() {
        eprintln!("(error) No command given. Run `keyreg --help` for usage.");
        1
    } else {
        run_pipe(&session, output_mode)
    }
}

fn open_registry(matches: &clap::ArgMatches) -> Result<std::sync::Arc<Registry>, String> {
    let admin = matches.get_one::<String>("admin");

    if matches.get_flag("cache") {
        let admin = admin.ok_or("--cache needs --admin")?;
        return Ok(Registry::ephemeral(admin.as_str()));
    }

    let path = matches
        .get_one::<String>("db")
        .map(|s| s.as_str())
        .unwrap_or(".keyreg");

    let opened = match admin {
        Some(admin) => {
            // An existing keyreg.toml keeps its settings; the engine rejects
            // an admin that differs from the recorded one.
            let config_path = Path::new(path).join(CONFIG_FILE_NAME);
            let mut cfg = if config_path.exists() {
                let mut cfg = RegistryConfig::from_file(&config_path)
                    .map_err(|e| format!("Failed to open registry: {}", e))?;
                cfg.admin = admin.clone();
                cfg
            } else {
                RegistryConfig::new(admin.as_str())
            };
            if let Some(mode) = matches.get_one::<String>("durability") {
                cfg = cfg.with_durability(mode.as_str());
            }
            Registry::open_with_config(path, cfg)
        }
        None => Registry::open(path),
    };
    let registry = opened.map_err(|e| format!("Failed to open registry: {}", e))?;
    info!(target: "keyreg::cli", path, "Opened registry");
    Ok(registry)
}

fn run_shell_mode(matches: &clap::ArgMatches, session: &Session, mode: OutputMode) -> i32 {
    match matches_to_call(matches) {
        Ok(call) => {
            if run_call(session, call, mode) {
                0
            } else {
                1
            }
        }
        Err(e) => {
            eprintln!("(error) {}", e);
            1
        }
    }
}

/// Run commands line by line from stdin.
///
/// Blank lines and `#` comments are skipped. A failed line is reported and
/// the next line still runs; the exit code is 1 if any line failed.
fn run_pipe(session: &Session, mode: OutputMode) -> i32 {
    let stdin = io::stdin();
    let mut exit_code = 0;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens = match shlex::split(trimmed) {
            Some(t) => t,
            None => {
                eprintln!("(error) Invalid quoting: {}", trimmed);
                exit_code = 1;
                continue;
            }
        };

        if tokens.is_empty() {
            continue;
        }

        let matches = match build_pipe_cmd().try_get_matches_from(tokens) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("{}", e);
                exit_code = 1;
                continue;
            }
        };

        let ok = match matches_to_call(&matches) {
            Ok(call) => run_call(session, call, mode),
            Err(e) => {
                eprintln!("(error) {}", e);
                false
            }
        };
        if !ok {
            exit_code = 1;
        }
    }

    exit_code
}

/// Execute a parsed call. Returns true on success, false on error.
fn run_call(session: &Session, call: CliCall, mode: OutputMode) -> bool {
    let result = match call.caller {
        Some(caller) => run_as(session, &caller, call.command),
        None => session.execute(call.command),
    };
    match result {
        Ok(output) => {
            let formatted = format_output(&output, mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
            true
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            false
        }
    }
}

fn run_as(
    session: &Session,
    caller: &Identity,
    cmd: keyreg_executor::Command,
) -> keyreg_executor::Result<keyreg_executor::Output> {
    session.executor().execute(caller, cmd)
}
