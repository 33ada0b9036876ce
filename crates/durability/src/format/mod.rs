//! On-disk formats
//!
//! - `wal_record`: WAL file header and framed, checksummed records
//! - `snapshot`: checkpoint file header

pub mod snapshot;
pub mod wal_record;

pub use snapshot::{SnapshotHeader, SNAPSHOT_FORMAT_VERSION, SNAPSHOT_HEADER_SIZE, SNAPSHOT_MAGIC};
pub use wal_record::{
    WalHeader, WalRecord, WalRecordError, WAL_HEADER_SIZE, WAL_MAGIC, WAL_RECORD_FORMAT_VERSION,
};
