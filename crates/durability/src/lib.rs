//! Durability layer for keyreg
//!
//! Two on-disk artifacts live in a registry's data directory:
//! - `registry.wal`: every committed mutation, framed and CRC-checked
//! - `registry.snap`: an optional checkpoint of the whole state
//!
//! Recovery loads the snapshot (if any) and replays log records whose
//! sequence is newer than the snapshot. Payload encoding is the engine's
//! business; this crate only moves checked bytes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod disk_snapshot;
pub mod format;
pub mod wal;

pub use disk_snapshot::{load_snapshot, LoadedSnapshot, SnapshotReadError, SnapshotWriter};
pub use format::{WalRecord, WalRecordError};
pub use wal::{
    DurabilityMode, ReadStopReason, WalCounters, WalReadResult, WalReader, WalReaderError,
    WalWriter,
};

use keyreg_core::RegistryError;

impl From<SnapshotReadError> for RegistryError {
    fn from(e: SnapshotReadError) -> Self {
        match e {
            SnapshotReadError::Io(message) => RegistryError::Storage { message },
            other => RegistryError::corruption(other.to_string()),
        }
    }
}

impl From<WalReaderError> for RegistryError {
    fn from(e: WalReaderError) -> Self {
        match e {
            WalReaderError::IoError(message) => RegistryError::Storage { message },
            WalReaderError::InvalidHeader => RegistryError::corruption(e.to_string()),
        }
    }
}
