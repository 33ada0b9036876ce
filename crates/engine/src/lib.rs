//! Registry engine for keyreg
//!
//! This crate owns the registry state machine:
//! - `state`: the arena-backed state container and its owner index
//! - `mutation`: the committed state transitions, shared by live calls and replay
//! - `clock`: sources for the marker stamped on entries
//! - `registry`: the `Registry` with open/recover, the call surface, and checkpoints
//!
//! Persistence (WAL records, snapshots) comes from `keyreg-durability`; the
//! engine decides what goes into them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod mutation;
pub mod registry;
pub mod state;

pub use clock::{Clock, ClockKind, LogicalClock, ManualClock, SystemClock};
pub use mutation::Mutation;
pub use registry::config::{RegistryConfig, CONFIG_FILE_NAME};
pub use registry::{Registry, LOCK_FILE_NAME};
pub use state::{ApplyError, EntryId, OwnerKeys, RegistryState};
