//! Checkpoint snapshot file format.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Header (24 bytes)                            │
//! │   magic "KREG" (4) | format version (4)      │
//! │   last sequence (8) | payload length (8)     │
//! ├──────────────────────────────────────────────┤
//! │ Payload (encoded registry state)             │
//! ├──────────────────────────────────────────────┤
//! │ CRC32 over header + payload (4)              │
//! └──────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

/// Magic bytes identifying a registry snapshot: "KREG"
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"KREG";

/// Current snapshot format version
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Size of the snapshot header in bytes
pub const SNAPSHOT_HEADER_SIZE: usize = 24;

/// Snapshot file name inside the data directory
pub const SNAPSHOT_FILE_NAME: &str = "registry.snap";

/// Path of the snapshot file for a data directory
pub fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join(SNAPSHOT_FILE_NAME)
}

/// Snapshot header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    /// Magic bytes: "KREG"
    pub magic: [u8; 4],
    /// Format version
    pub format_version: u32,
    /// Sequence of the last mutation folded into the snapshot
    pub last_sequence: u64,
    /// Length of the payload that follows the header
    pub payload_len: u64,
}

impl SnapshotHeader {
    /// Create a header for the current format
    pub fn new(last_sequence: u64, payload_len: u64) -> Self {
        SnapshotHeader {
            magic: SNAPSHOT_MAGIC,
            format_version: SNAPSHOT_FORMAT_VERSION,
            last_sequence,
            payload_len,
        }
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self) -> [u8; SNAPSHOT_HEADER_SIZE] {
        let mut bytes = [0u8; SNAPSHOT_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.format_version.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.last_sequence.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    /// Deserialize header from bytes
    pub fn from_bytes(bytes: &[u8; SNAPSHOT_HEADER_SIZE]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[4..8]);
        let mut seq = [0u8; 8];
        seq.copy_from_slice(&bytes[8..16]);
        let mut len = [0u8; 8];
        len.copy_from_slice(&bytes[16..24]);
        SnapshotHeader {
            magic,
            format_version: u32::from_le_bytes(version),
            last_sequence: u64::from_le_bytes(seq),
            payload_len: u64::from_le_bytes(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = SnapshotHeader::new(42, 1024);
        assert_eq!(SnapshotHeader::from_bytes(&header.to_bytes()), header);
    }

    #[test]
    fn test_snapshot_path() {
        let path = snapshot_path(Path::new("/data"));
        assert_eq!(path, PathBuf::from("/data/registry.snap"));
    }
}
