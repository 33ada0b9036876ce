//! WAL file and record format.
//!
//! The log is a single file, `registry.wal`, inside the data directory.
//!
//! # File Layout
//!
//! ```text
//! ┌────────────────────────────────────┐
//! │ File Header (8 bytes)              │
//! ├────────────────────────────────────┤
//! │ Record 1                           │
//! ├────────────────────────────────────┤
//! │ Record 2                           │
//! ├────────────────────────────────────┤
//! │ ...                                │
//! └────────────────────────────────────┘
//! ```
//!
//! # Record Layout
//!
//! ```text
//! ┌─────────────────┬──────────────────┬─────────────────────────┬──────────┐
//! │ Length (4 bytes)│ Format Ver (1)   │ Payload (variable)      │ CRC32 (4)│
//! └─────────────────┴──────────────────┴─────────────────────────┴──────────┘
//!
//! Payload:
//! ┌──────────────┬──────────────┬─────────────────────────────┐
//! │ Sequence (8) │ Timestamp (8)│ Mutation (variable)         │
//! └──────────────┴──────────────┴─────────────────────────────┘
//! ```

use crc32fast::Hasher;
use thiserror::Error;

/// Magic bytes identifying a registry WAL file: "KRWL"
pub const WAL_MAGIC: [u8; 4] = *b"KRWL";

/// Current WAL file format version
pub const WAL_FILE_FORMAT_VERSION: u32 = 1;

/// Size of the WAL file header in bytes
pub const WAL_HEADER_SIZE: usize = 8;

/// Current WAL record format version
pub const WAL_RECORD_FORMAT_VERSION: u8 = 1;

/// Minimum payload: version (1) + sequence (8) + timestamp (8)
const MIN_PAYLOAD_SIZE: usize = 17;

/// WAL file header (8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalHeader {
    /// Magic bytes: "KRWL"
    pub magic: [u8; 4],
    /// Format version for forward compatibility
    pub format_version: u32,
}

impl WalHeader {
    /// Header for a freshly created log.
    pub fn current() -> Self {
        WalHeader {
            magic: WAL_MAGIC,
            format_version: WAL_FILE_FORMAT_VERSION,
        }
    }

    /// Serialize header to bytes.
    pub fn to_bytes(&self) -> [u8; WAL_HEADER_SIZE] {
        let mut bytes = [0u8; WAL_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.format_version.to_le_bytes());
        bytes
    }

    /// Deserialize header from bytes.
    pub fn from_bytes(bytes: &[u8; WAL_HEADER_SIZE]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[4..8]);
        WalHeader {
            magic,
            format_version: u32::from_le_bytes(version),
        }
    }

    /// Validate magic bytes and format version.
    pub fn is_valid(&self) -> bool {
        self.magic == WAL_MAGIC && self.format_version == WAL_FILE_FORMAT_VERSION
    }
}

/// One committed mutation as it appears in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalRecord {
    /// Commit sequence number (assigned by the engine, strictly increasing)
    pub sequence: u64,

    /// Marker the mutation was committed at
    pub timestamp: u64,

    /// Encoded mutation
    pub payload: Vec<u8>,
}

impl WalRecord {
    /// Create a new WAL record.
    pub fn new(sequence: u64, timestamp: u64, payload: Vec<u8>) -> Self {
        WalRecord {
            sequence,
            timestamp,
            payload,
        }
    }

    /// Serialize record to bytes (for writing to WAL).
    ///
    /// Format: length (4) + format_version (1) + sequence (8) + timestamp (8)
    /// + payload + crc32 (4)
    ///
    /// The length field covers everything after itself, crc included.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(MIN_PAYLOAD_SIZE + self.payload.len());
        body.push(WAL_RECORD_FORMAT_VERSION);
        body.extend_from_slice(&self.sequence.to_le_bytes());
        body.extend_from_slice(&self.timestamp.to_le_bytes());
        body.extend_from_slice(&self.payload);

        let crc = compute_crc(&body);

        let total_len = body.len() + 4;
        let mut record = Vec::with_capacity(4 + total_len);
        record.extend_from_slice(&(total_len as u32).to_le_bytes());
        record.extend_from_slice(&body);
        record.extend_from_slice(&crc.to_le_bytes());
        record
    }

    /// Deserialize record from bytes.
    ///
    /// Returns (record, bytes_consumed) on success.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), WalRecordError> {
        if bytes.len() < 4 {
            return Err(WalRecordError::InsufficientData);
        }

        let length = read_u32(&bytes[0..4]) as usize;
        if length == 0 {
            return Err(WalRecordError::InvalidFormat);
        }
        if bytes.len() < 4 + length {
            return Err(WalRecordError::InsufficientData);
        }
        if length < MIN_PAYLOAD_SIZE + 4 {
            return Err(WalRecordError::InvalidFormat);
        }

        let body_with_crc = &bytes[4..4 + length];
        let body = &body_with_crc[..length - 4];
        let stored_crc = read_u32(&body_with_crc[length - 4..]);

        let computed_crc = compute_crc(body);
        if computed_crc != stored_crc {
            return Err(WalRecordError::ChecksumMismatch {
                expected: stored_crc,
                computed: computed_crc,
            });
        }

        let format_version = body[0];
        if format_version != WAL_RECORD_FORMAT_VERSION {
            return Err(WalRecordError::UnsupportedVersion(format_version));
        }

        let record = WalRecord {
            sequence: read_u64(&body[1..9]),
            timestamp: read_u64(&body[9..17]),
            payload: body[17..].to_vec(),
        };

        Ok((record, 4 + length))
    }
}

/// Compute CRC32 checksum of data.
pub(crate) fn compute_crc(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

/// WAL record parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalRecordError {
    /// Not enough data to parse record
    #[error("Insufficient data to parse record")]
    InsufficientData,

    /// Record format is invalid
    #[error("Invalid record format")]
    InvalidFormat,

    /// Checksum verification failed
    #[error("Checksum mismatch: expected {expected:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        /// Expected checksum from record
        expected: u32,
        /// Computed checksum
        computed: u32,
    },

    /// Unsupported format version
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = WalHeader::current();
        let parsed = WalHeader::from_bytes(&header.to_bytes());
        assert_eq!(parsed, header);
        assert!(parsed.is_valid());
    }

    #[test]
    fn test_header_rejects_bad_magic() {
        let mut bytes = WalHeader::current().to_bytes();
        bytes[0] = b'X';
        assert!(!WalHeader::from_bytes(&bytes).is_valid());
    }

    #[test]
    fn test_record_roundtrip() {
        let record = WalRecord::new(7, 1_000, b"created".to_vec());
        let bytes = record.to_bytes();
        let (parsed, consumed) = WalRecord::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_record_with_empty_payload() {
        let record = WalRecord::new(1, 1, Vec::new());
        let (parsed, _) = WalRecord::from_bytes(&record.to_bytes()).unwrap();
        assert!(parsed.payload.is_empty());
    }

    #[test]
    fn test_truncated_record_needs_more_data() {
        let bytes = WalRecord::new(1, 2, b"payload".to_vec()).to_bytes();
        let err = WalRecord::from_bytes(&bytes[..bytes.len() - 3]).unwrap_err();
        assert_eq!(err, WalRecordError::InsufficientData);
    }

    #[test]
    fn test_flipped_byte_fails_checksum() {
        let mut bytes = WalRecord::new(1, 2, b"payload".to_vec()).to_bytes();
        bytes[10] ^= 0xFF;
        let err = WalRecord::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, WalRecordError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_zero_length_is_invalid() {
        let err = WalRecord::from_bytes(&[0, 0, 0, 0]).unwrap_err();
        assert_eq!(err, WalRecordError::InvalidFormat);
    }
}
