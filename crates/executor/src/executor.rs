//! The Executor - single entry point to the registry engine.
//!
//! The Executor is a stateless dispatcher that routes commands to the
//! appropriate registry operations and converts results to outputs.

use std::sync::Arc;

use keyreg_core::Identity;
use keyreg_engine::Registry;
use tracing::debug;

use crate::handlers::{admin, entry, index, registry};
use crate::types::AccessMode;
use crate::{Command, Error, Output, Result};

/// The command executor - single entry point to the registry engine.
///
/// The Executor is **stateless**: it holds a reference to the registry but
/// maintains no state of its own. All state lives in the engine.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads. Calls from
/// different threads are serialized by the registry itself.
///
/// # Example
///
/// ```
/// use keyreg_executor::{Command, Executor, Output, Registry};
///
/// let executor = Executor::new(Registry::ephemeral("wallet_1"));
/// let caller = "wallet_1".into();
///
/// executor
///     .execute(&caller, Command::CreateEntry { key: "k1".into(), value: "v1".into() })
///     .unwrap();
///
/// let results = executor.execute_many(
///     &caller,
///     vec![
///         Command::GetKeyCount { owner: "wallet_1".into() },
///         Command::GetKeyByOwner { owner: "wallet_1".into(), index: 0 },
///     ],
/// );
/// assert_eq!(results[0], Ok(Output::Uint(1)));
/// assert_eq!(results[1], Ok(Output::Key("k1".into())));
/// ```
#[derive(Debug, Clone)]
pub struct Executor {
    registry: Arc<Registry>,
    access_mode: AccessMode,
}

impl Executor {
    /// Create a new read-write executor over a registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::new_with_mode(registry, AccessMode::ReadWrite)
    }

    /// Create an executor with an explicit access mode.
    pub fn new_with_mode(registry: Arc<Registry>, access_mode: AccessMode) -> Self {
        Self {
            registry,
            access_mode,
        }
    }

    /// The registry this executor dispatches to.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Access mode in effect.
    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// Execute a single command on behalf of `caller`.
    ///
    /// Returns the command result or an error.
    pub fn execute(&self, caller: &Identity, cmd: Command) -> Result<Output> {
        if self.access_mode == AccessMode::ReadOnly && !cmd.is_read_only() {
            return Err(Error::AccessDenied {
                command: cmd.name().to_string(),
            });
        }

        debug!(target: "keyreg::executor", command = cmd.name(), caller = %caller, "Executing");

        let reg = &self.registry;
        match cmd {
            // Entry commands
            Command::CreateEntry { key, value } => entry::create_entry(reg, caller, key, value),
            Command::GetEntry { key } => entry::get_entry(reg, key),
            Command::UpdateEntry { key, value } => entry::update_entry(reg, caller, key, value),
            Command::DeleteEntry { key } => entry::delete_entry(reg, caller, key),
            Command::TransferEntry { key, new_owner } => {
                entry::transfer_entry(reg, caller, key, new_owner)
            }

            // Admin and moderation commands
            Command::SetPaused { paused } => admin::set_paused(reg, caller, paused),
            Command::AddModerator { identity } => admin::add_moderator(reg, caller, identity),
            Command::RemoveModerator { identity } => {
                admin::remove_moderator(reg, caller, identity)
            }
            Command::SetKeyFrozen { key, frozen } => {
                admin::set_key_frozen(reg, caller, key, frozen)
            }
            Command::IsModerator { identity } => admin::is_moderator(reg, identity),
            Command::IsPaused => admin::is_paused(reg),

            // Index commands
            Command::GetKeyCount { owner } => index::get_key_count(reg, owner),
            Command::GetKeyByOwner { owner, index: i } => index::get_key_by_owner(reg, owner, i),
            Command::KeysByOwner { owner } => index::keys_by_owner(reg, owner),
            Command::ConcatKeys { a, b } => index::concat(reg, a, b),

            // Registry commands
            Command::Ping => Ok(Output::Pong {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
            Command::Info => registry::info(reg),
            Command::Flush => registry::flush(reg),
            Command::Checkpoint => registry::checkpoint(reg),
        }
    }

    /// Execute multiple commands sequentially on behalf of `caller`.
    ///
    /// Returns all results in the same order as the input commands.
    /// Execution continues even if some commands fail; each call is atomic
    /// on its own, the batch is not.
    pub fn execute_many(&self, caller: &Identity, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter()
            .map(|cmd| self.execute(caller, cmd))
            .collect()
    }
}
