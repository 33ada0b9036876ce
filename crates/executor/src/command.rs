//! Command enum defining all registry operations.
//!
//! Commands are the call surface of the registry. Every operation a host can
//! perform is a variant of this enum, with typed arguments; malformed calls
//! are rejected when the command is built or deserialized, before anything
//! reaches the engine. Semantic checks (empty key, oversized value) still
//! happen in the engine.
//!
//! The caller identity is not part of the command. It is supplied alongside
//! it by the host (see [`Executor::execute`](crate::Executor::execute)).

use keyreg_core::Identity;
use serde::{Deserialize, Serialize};

/// A command is a self-contained, serializable registry call.
///
/// # Command Categories
///
/// | Category | Count | Description |
/// |----------|-------|-------------|
/// | Entry | 5 | Create, read, update, delete, transfer |
/// | Admin | 3 | Pause flag and moderator set |
/// | Moderation | 1 | Per-entry freeze flag |
/// | Index | 3 | Per-owner enumeration |
/// | Query | 2 | Moderator and pause lookups |
/// | Utility | 1 | Key composition |
/// | Registry | 4 | Ping, info, flush, checkpoint |
///
/// # Example
///
/// ```
/// use keyreg_executor::Command;
///
/// let cmd = Command::CreateEntry {
///     key: "hotline:region1".into(),
///     value: "tel:123-456".into(),
/// };
/// assert!(!cmd.is_read_only());
/// assert_eq!(cmd.name(), "CreateEntry");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Entry (5) ====================
    /// Register a new key owned by the caller.
    /// Returns: `Output::Unit`
    CreateEntry { key: String, value: String },

    /// Read an entry. No authorization required.
    /// Returns: `Output::Entry`
    GetEntry { key: String },

    /// Replace the value of an entry the caller owns.
    /// Returns: `Output::Unit`
    UpdateEntry { key: String, value: String },

    /// Remove an entry the caller owns.
    /// Returns: `Output::Unit`
    DeleteEntry { key: String },

    /// Hand an entry the caller owns to another identity.
    /// Returns: `Output::Unit`
    TransferEntry { key: String, new_owner: Identity },

    // ==================== Admin (3) ====================
    /// Set the global pause flag (admin only).
    /// Returns: `Output::Unit`
    SetPaused { paused: bool },

    /// Grant freeze authority (admin only).
    /// Returns: `Output::Unit`
    AddModerator { identity: Identity },

    /// Revoke freeze authority (admin only).
    /// Returns: `Output::Unit`
    RemoveModerator { identity: Identity },

    // ==================== Moderation (1) ====================
    /// Set an entry's freeze flag (moderators only).
    /// Returns: `Output::Unit`
    SetKeyFrozen { key: String, frozen: bool },

    // ==================== Index (3) ====================
    /// Number of keys an identity owns.
    /// Returns: `Output::Uint`
    GetKeyCount { owner: Identity },

    /// Key at a position in an owner's index.
    /// Returns: `Output::Key`
    GetKeyByOwner { owner: Identity, index: u64 },

    /// Every key an owner holds, in index order.
    /// Returns: `Output::Keys`
    KeysByOwner { owner: Identity },

    // ==================== Query (2) ====================
    /// Whether an identity is a moderator.
    /// Returns: `Output::Bool`
    IsModerator { identity: Identity },

    /// Whether creation is paused.
    /// Returns: `Output::Bool`
    IsPaused,

    // ==================== Utility (1) ====================
    /// Join two key fragments into one key.
    /// Returns: `Output::Key`
    ConcatKeys { a: String, b: String },

    // ==================== Registry (4) ====================
    /// Liveness check.
    /// Returns: `Output::Pong`
    Ping,

    /// Registry summary.
    /// Returns: `Output::Info`
    Info,

    /// Force pending WAL records to disk.
    /// Returns: `Output::Unit`
    Flush,

    /// Snapshot the state and truncate the WAL.
    /// Returns: `Output::Unit`
    Checkpoint,
}

impl Command {
    /// True for commands that never change registry state.
    ///
    /// `Flush` and `Checkpoint` count as writes: they touch disk.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Command::GetEntry { .. }
                | Command::GetKeyCount { .. }
                | Command::GetKeyByOwner { .. }
                | Command::KeysByOwner { .. }
                | Command::IsModerator { .. }
                | Command::IsPaused
                | Command::ConcatKeys { .. }
                | Command::Ping
                | Command::Info
        )
    }

    /// Variant name, for logs and access-denied errors.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateEntry { .. } => "CreateEntry",
            Command::GetEntry { .. } => "GetEntry",
            Command::UpdateEntry { .. } => "UpdateEntry",
            Command::DeleteEntry { .. } => "DeleteEntry",
            Command::TransferEntry { .. } => "TransferEntry",
            Command::SetPaused { .. } => "SetPaused",
            Command::AddModerator { .. } => "AddModerator",
            Command::RemoveModerator { .. } => "RemoveModerator",
            Command::SetKeyFrozen { .. } => "SetKeyFrozen",
            Command::GetKeyCount { .. } => "GetKeyCount",
            Command::GetKeyByOwner { .. } => "GetKeyByOwner",
            Command::KeysByOwner { .. } => "KeysByOwner",
            Command::IsModerator { .. } => "IsModerator",
            Command::IsPaused => "IsPaused",
            Command::ConcatKeys { .. } => "ConcatKeys",
            Command::Ping => "Ping",
            Command::Info => "Info",
            Command::Flush => "Flush",
            Command::Checkpoint => "Checkpoint",
        }
    }
}
