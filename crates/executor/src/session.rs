//! Caller-bound session with typed helpers.
//!
//! A [`Session`] pairs an [`Executor`] with one caller identity, so hosts
//! that act on behalf of a single wallet don't have to pass it on every
//! call. The typed helpers unwrap the [`Output`] variant each command is
//! documented to return.
//!
//! # Usage
//!
//! ```
//! use keyreg_executor::{Registry, Session};
//!
//! let registry = Registry::ephemeral("admin");
//! let alice = Session::new(registry.clone(), "alice");
//!
//! alice.create_entry("hotline:region1", "tel:123-456").unwrap();
//! assert_eq!(alice.get_key_count("alice").unwrap(), 1);
//! assert_eq!(alice.get_entry("hotline:region1").unwrap().version, 1);
//! ```

use std::sync::Arc;

use keyreg_core::Identity;
use keyreg_engine::Registry;

use crate::types::{AccessMode, EntryInfo, RegistryInfo};
use crate::{Command, Error, Executor, Output, Result};

/// An [`Executor`] bound to one caller identity.
#[derive(Debug, Clone)]
pub struct Session {
    executor: Executor,
    caller: Identity,
}

fn unexpected(command: &str, output: Output) -> Error {
    Error::Internal {
        reason: format!("Unexpected output for {command}: {output:?}"),
    }
}

impl Session {
    /// Create a read-write session for `caller`.
    pub fn new(registry: Arc<Registry>, caller: impl Into<Identity>) -> Self {
        Self::with_executor(Executor::new(registry), caller)
    }

    /// Create a read-only session for `caller`.
    pub fn read_only(registry: Arc<Registry>, caller: impl Into<Identity>) -> Self {
        Self::with_executor(Executor::new_with_mode(registry, AccessMode::ReadOnly), caller)
    }

    /// Bind an existing executor to `caller`.
    pub fn with_executor(executor: Executor, caller: impl Into<Identity>) -> Self {
        Self {
            executor,
            caller: caller.into(),
        }
    }

    /// The identity every command runs as.
    pub fn caller(&self) -> &Identity {
        &self.caller
    }

    /// The underlying executor.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Execute a command as this session's caller.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        self.executor.execute(&self.caller, cmd)
    }

    /// Execute commands in order as this session's caller.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        self.executor.execute_many(&self.caller, cmds)
    }

    fn unit(&self, cmd: Command) -> Result<()> {
        let name = cmd.name();
        match self.execute(cmd)? {
            Output::Unit => Ok(()),
            other => Err(unexpected(name, other)),
        }
    }

    fn boolean(&self, cmd: Command) -> Result<bool> {
        let name = cmd.name();
        match self.execute(cmd)? {
            Output::Bool(b) => Ok(b),
            other => Err(unexpected(name, other)),
        }
    }

    fn key(&self, cmd: Command) -> Result<String> {
        let name = cmd.name();
        match self.execute(cmd)? {
            Output::Key(k) => Ok(k),
            other => Err(unexpected(name, other)),
        }
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// Register `key` with `value`, owned by the caller.
    pub fn create_entry(&self, key: &str, value: &str) -> Result<()> {
        self.unit(Command::CreateEntry {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Read an entry.
    pub fn get_entry(&self, key: &str) -> Result<EntryInfo> {
        match self.execute(Command::GetEntry {
            key: key.to_string(),
        })? {
            Output::Entry(info) => Ok(info),
            other => Err(unexpected("GetEntry", other)),
        }
    }

    /// Replace the value of an entry the caller owns.
    pub fn update_entry(&self, key: &str, value: &str) -> Result<()> {
        self.unit(Command::UpdateEntry {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Remove an entry the caller owns.
    pub fn delete_entry(&self, key: &str) -> Result<()> {
        self.unit(Command::DeleteEntry {
            key: key.to_string(),
        })
    }

    /// Hand an entry the caller owns to `new_owner`.
    pub fn transfer_entry(&self, key: &str, new_owner: impl Into<Identity>) -> Result<()> {
        self.unit(Command::TransferEntry {
            key: key.to_string(),
            new_owner: new_owner.into(),
        })
    }

    // =========================================================================
    // Administration and moderation
    // =========================================================================

    /// Set the global pause flag. Admin only.
    pub fn set_paused(&self, paused: bool) -> Result<()> {
        self.unit(Command::SetPaused { paused })
    }

    /// Grant freeze authority. Admin only.
    pub fn add_moderator(&self, identity: impl Into<Identity>) -> Result<()> {
        self.unit(Command::AddModerator {
            identity: identity.into(),
        })
    }

    /// Revoke freeze authority. Admin only.
    pub fn remove_moderator(&self, identity: impl Into<Identity>) -> Result<()> {
        self.unit(Command::RemoveModerator {
            identity: identity.into(),
        })
    }

    /// Freeze or unfreeze an entry. Moderators only.
    pub fn set_key_frozen(&self, key: &str, frozen: bool) -> Result<()> {
        self.unit(Command::SetKeyFrozen {
            key: key.to_string(),
            frozen,
        })
    }

    /// Whether `identity` is a moderator.
    pub fn is_moderator(&self, identity: impl Into<Identity>) -> Result<bool> {
        self.boolean(Command::IsModerator {
            identity: identity.into(),
        })
    }

    /// Whether creation is paused.
    pub fn is_paused(&self) -> Result<bool> {
        self.boolean(Command::IsPaused)
    }

    // =========================================================================
    // Owner index
    // =========================================================================

    /// Number of keys `owner` holds.
    pub fn get_key_count(&self, owner: impl Into<Identity>) -> Result<u64> {
        match self.execute(Command::GetKeyCount {
            owner: owner.into(),
        })? {
            Output::Uint(n) => Ok(n),
            other => Err(unexpected("GetKeyCount", other)),
        }
    }

    /// Key at `index` in `owner`'s list.
    pub fn get_key_by_owner(&self, owner: impl Into<Identity>, index: u64) -> Result<String> {
        self.key(Command::GetKeyByOwner {
            owner: owner.into(),
            index,
        })
    }

    /// All of `owner`'s keys in index order.
    pub fn keys_by_owner(&self, owner: impl Into<Identity>) -> Result<Vec<String>> {
        match self.execute(Command::KeysByOwner {
            owner: owner.into(),
        })? {
            Output::Keys(keys) => Ok(keys),
            other => Err(unexpected("KeysByOwner", other)),
        }
    }

    /// Join two fragments into one key.
    pub fn concat_keys(&self, a: &str, b: &str) -> Result<String> {
        self.key(Command::ConcatKeys {
            a: a.to_string(),
            b: b.to_string(),
        })
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Registry summary.
    pub fn info(&self) -> Result<RegistryInfo> {
        match self.execute(Command::Info)? {
            Output::Info(info) => Ok(info),
            other => Err(unexpected("Info", other)),
        }
    }

    /// Force pending log records to disk.
    pub fn flush(&self) -> Result<()> {
        self.unit(Command::Flush)
    }

    /// Snapshot state and truncate the log.
    pub fn checkpoint(&self) -> Result<()> {
        self.unit(Command::Checkpoint)
    }
}
