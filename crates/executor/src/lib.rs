//! # Keyreg Executor
//!
//! The call surface of the keyreg registry.
//!
//! This is the crate hosts import. It provides:
//! - [`Command`]/[`Output`]/[`Error`] - the serializable call interface
//! - [`Executor`] - dispatches commands on behalf of a caller identity
//! - [`Session`] - an executor bound to one caller, with typed helpers
//!
//! ## Quick Start
//!
//! ```
//! use keyreg_executor::{Command, Executor, Output, Registry};
//!
//! let executor = Executor::new(Registry::ephemeral("admin"));
//! let wallet = "wallet_1".into();
//!
//! executor
//!     .execute(&wallet, Command::CreateEntry { key: "k1".into(), value: "v1".into() })
//!     .unwrap();
//! assert_eq!(
//!     executor.execute(&wallet, Command::GetKeyCount { owner: "wallet_1".into() }),
//!     Ok(Output::Uint(1)),
//! );
//! ```
//!
//! ## Authority
//!
//! | Role | May |
//! |------|-----|
//! | Anyone | create entries, read everything |
//! | Owner | update, delete, transfer own unfrozen entries |
//! | Moderator | freeze and unfreeze any entry |
//! | Admin | pause creation, manage moderators |

#![warn(missing_docs)]

mod command;
mod convert;
mod error;
mod executor;
mod output;
mod session;
mod types;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything hosts need is re-exported here
// =============================================================================

pub use command::Command;
pub use error::Error;
pub use executor::Executor;
pub use output::Output;
pub use session::Session;
pub use types::*;

// Re-export core types so hosts don't need keyreg-core directly
pub use keyreg_core::{Identity, Limits, Timestamp};

// Re-export engine types so hosts don't need keyreg-engine directly
pub use keyreg_engine::{ManualClock, Registry, RegistryConfig, CONFIG_FILE_NAME};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
