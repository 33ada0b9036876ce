//! Checkpoint snapshots
//!
//! A snapshot captures the whole registry state so the WAL can be truncated.

mod reader;
mod writer;

pub use reader::{load_snapshot, LoadedSnapshot, SnapshotReadError};
pub use writer::SnapshotWriter;
