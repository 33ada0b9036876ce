//! Output → human/json/raw string formatting.
//!
//! Three modes:
//! - **Human** (default): Redis-style, e.g. `"key"`, `(integer) 42`, `OK`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`
//! - **Raw** (`--raw`): Bare values, no quotes, no type prefixes

use keyreg_executor::{EntryInfo, Error, Output, RegistryInfo};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Raw,
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(output),
        OutputMode::Raw => format_raw(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": err.kind(),
            "message": err.to_string(),
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Raw => err.to_string(),
        OutputMode::Human => format!("(error) {}", err),
    }
}

fn format_json(output: &Output) -> String {
    serde_json::to_string_pretty(output).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

// =========================================================================
// Raw mode
// =========================================================================

fn format_raw(output: &Output) -> String {
    match output {
        Output::Unit => String::new(),
        Output::Entry(entry) => entry.value.clone(),
        Output::Uint(n) => n.to_string(),
        Output::Key(key) => key.clone(),
        Output::Keys(keys) => keys.join("\n"),
        Output::Bool(b) => {
            if *b {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        Output::Pong { version } => version.clone(),
        Output::Info(info) => format_info(info),
    }
}

// =========================================================================
// Human mode
// =========================================================================

fn format_human(output: &Output) -> String {
    match output {
        Output::Unit => "OK".to_string(),
        Output::Entry(entry) => format_entry(entry),
        Output::Uint(n) => format!("(integer) {}", n),
        Output::Key(key) => format!("\"{}\"", key),
        Output::Keys(keys) => format_string_list(keys),
        Output::Bool(b) => format!("(boolean) {}", b),
        Output::Pong { version } => format!("PONG {}", version),
        Output::Info(info) => format_info(info),
    }
}

fn format_entry(entry: &EntryInfo) -> String {
    format!(
        "key: \"{}\"\nvalue: \"{}\"\nowner: {}\nversion: {}\ncreated_at: {}\nupdated_at: {}\nfrozen: {}",
        entry.key,
        entry.value,
        entry.owner,
        entry.version,
        entry.created_at,
        entry.updated_at,
        entry.frozen
    )
}

fn format_info(info: &RegistryInfo) -> String {
    format!(
        "version: {}\nadmin: {}\npaused: {}\nentries: {}\nowners: {}\nmoderators: {}\nlast_sequence: {}\ndurability: {}",
        info.version,
        info.admin,
        info.paused,
        info.entry_count,
        info.owner_count,
        info.moderator_count,
        info.last_sequence,
        info.durability
    )
}

fn format_string_list(items: &[String]) -> String {
    if items.is_empty() {
        "(empty list)".to_string()
    } else {
        items
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}) \"{}\"", i + 1, s))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
