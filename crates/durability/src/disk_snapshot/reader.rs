//! Snapshot reader for recovery
//!
//! Loads and validates the checkpoint file written by `SnapshotWriter`.

use std::path::Path;

use thiserror::Error;

use crate::format::snapshot::{
    snapshot_path, SnapshotHeader, SNAPSHOT_FORMAT_VERSION, SNAPSHOT_HEADER_SIZE, SNAPSHOT_MAGIC,
};
use crate::format::wal_record::compute_crc;

/// A validated snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSnapshot {
    /// Sequence of the last mutation folded into the snapshot
    pub last_sequence: u64,
    /// Encoded registry state
    pub payload: Vec<u8>,
}

/// Load the snapshot in `dir`, if one exists.
pub fn load_snapshot(dir: &Path) -> Result<Option<LoadedSnapshot>, SnapshotReadError> {
    let path = snapshot_path(dir);
    if !path.exists() {
        return Ok(None);
    }

    let bytes = std::fs::read(&path).map_err(|e| SnapshotReadError::Io(e.to_string()))?;
    if bytes.len() < SNAPSHOT_HEADER_SIZE + 4 {
        return Err(SnapshotReadError::FileTooSmall { size: bytes.len() });
    }

    let mut header_bytes = [0u8; SNAPSHOT_HEADER_SIZE];
    header_bytes.copy_from_slice(&bytes[..SNAPSHOT_HEADER_SIZE]);
    let header = SnapshotHeader::from_bytes(&header_bytes);

    if header.magic != SNAPSHOT_MAGIC {
        return Err(SnapshotReadError::InvalidMagic {
            actual: header.magic,
        });
    }
    if header.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(SnapshotReadError::UnsupportedVersion(header.format_version));
    }

    let expected_len = SNAPSHOT_HEADER_SIZE as u64 + header.payload_len + 4;
    if bytes.len() as u64 != expected_len {
        return Err(SnapshotReadError::LengthMismatch {
            expected: expected_len,
            actual: bytes.len() as u64,
        });
    }

    let crc_offset = bytes.len() - 4;
    let mut crc_bytes = [0u8; 4];
    crc_bytes.copy_from_slice(&bytes[crc_offset..]);
    let stored = u32::from_le_bytes(crc_bytes);
    let computed = compute_crc(&bytes[..crc_offset]);
    if stored != computed {
        return Err(SnapshotReadError::CrcMismatch { stored, computed });
    }

    Ok(Some(LoadedSnapshot {
        last_sequence: header.last_sequence,
        payload: bytes[SNAPSHOT_HEADER_SIZE..crc_offset].to_vec(),
    }))
}

/// Snapshot read errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotReadError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(String),

    /// File is smaller than a header plus checksum
    #[error("snapshot file too small: {size} bytes")]
    FileTooSmall {
        /// Actual size
        size: usize,
    },

    /// Magic bytes did not match
    #[error("invalid snapshot magic: {actual:?}")]
    InvalidMagic {
        /// Bytes found
        actual: [u8; 4],
    },

    /// Format version is not supported
    #[error("unsupported snapshot format version: {0}")]
    UnsupportedVersion(u32),

    /// Header length disagrees with file size
    #[error("snapshot length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Size implied by the header
        expected: u64,
        /// Size on disk
        actual: u64,
    },

    /// Checksum did not match
    #[error("snapshot CRC mismatch: stored {stored:08x}, computed {computed:08x}")]
    CrcMismatch {
        /// CRC stored in the file
        stored: u32,
        /// CRC computed over the content
        computed: u32,
    },
}
