//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant. The mapping is fixed:
//! the same command always produces the same variant, though the values
//! depend on registry state.

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Successful command execution results.
///
/// Each [`Command`](crate::Command) variant maps to exactly one `Output`
/// variant, documented on the command.
///
/// # Example
///
/// ```
/// use keyreg_executor::{Command, Executor, Output, Registry};
///
/// let registry = Registry::ephemeral("wallet_1");
/// let executor = Executor::new(registry);
/// let caller = "wallet_1".into();
///
/// match executor.execute(&caller, Command::IsPaused).unwrap() {
///     Output::Bool(paused) => assert!(!paused),
///     other => panic!("unexpected output: {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (mutations, flush, checkpoint)
    Unit,

    /// A single entry
    Entry(EntryInfo),

    /// Unsigned integer result (counts)
    Uint(u64),

    /// A single key
    Key(String),

    /// Keys in index order
    Keys(Vec<String>),

    /// Boolean result
    Bool(bool),

    /// Ping response
    Pong {
        /// Executor crate version string.
        version: String,
    },

    /// Registry summary
    Info(RegistryInfo),
}
