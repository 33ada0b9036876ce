//! WAL reader for recovery and replay.

use crate::format::{WalHeader, WalRecord, WalRecordError, WAL_HEADER_SIZE};
use crate::wal::writer::wal_path;
use std::path::Path;
use thiserror::Error;

/// Why reading stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStopReason {
    /// Successfully read all records to end of data
    EndOfData,
    /// Partial record at end of the log (expected after a crash mid-append)
    PartialRecord,
    /// CRC checksum mismatch - data is corrupted
    ChecksumMismatch {
        /// Byte offset within the file where the mismatch was detected
        offset: u64,
    },
    /// CRC was valid but the record could not be parsed
    ParseError {
        /// Byte offset within the file where parsing failed
        offset: u64,
        /// Human-readable error description
        detail: String,
    },
}

/// Result of reading the whole log
#[derive(Debug, Clone)]
pub struct WalReadResult {
    /// Valid records, in log order
    pub records: Vec<WalRecord>,
    /// Byte offset where valid records end
    pub valid_end: u64,
    /// Why reading stopped
    pub stop_reason: ReadStopReason,
}

/// WAL reader for iterating over records.
pub struct WalReader;

impl WalReader {
    /// Read every valid record from the log in `dir`.
    ///
    /// A missing log reads as empty. Reading stops at the first record that
    /// cannot be decoded; `valid_end` marks where the good prefix ends.
    pub fn read_all(dir: &Path) -> Result<WalReadResult, WalReaderError> {
        let path = wal_path(dir);
        if !path.exists() {
            return Ok(WalReadResult {
                records: Vec::new(),
                valid_end: 0,
                stop_reason: ReadStopReason::EndOfData,
            });
        }

        let buffer = std::fs::read(&path).map_err(|e| WalReaderError::IoError(e.to_string()))?;
        Self::read_bytes(&buffer)
    }

    /// Decode a full log image (header included).
    pub fn read_bytes(buffer: &[u8]) -> Result<WalReadResult, WalReaderError> {
        if buffer.is_empty() {
            return Ok(WalReadResult {
                records: Vec::new(),
                valid_end: 0,
                stop_reason: ReadStopReason::EndOfData,
            });
        }
        if buffer.len() < WAL_HEADER_SIZE {
            return Err(WalReaderError::InvalidHeader);
        }
        let mut header_bytes = [0u8; WAL_HEADER_SIZE];
        header_bytes.copy_from_slice(&buffer[..WAL_HEADER_SIZE]);
        if !WalHeader::from_bytes(&header_bytes).is_valid() {
            return Err(WalReaderError::InvalidHeader);
        }

        let mut records = Vec::new();
        let mut offset = WAL_HEADER_SIZE;
        let mut stop_reason = ReadStopReason::EndOfData;

        while offset < buffer.len() {
            match WalRecord::from_bytes(&buffer[offset..]) {
                Ok((record, consumed)) => {
                    records.push(record);
                    offset += consumed;
                }
                Err(WalRecordError::InsufficientData) => {
                    stop_reason = ReadStopReason::PartialRecord;
                    break;
                }
                Err(WalRecordError::ChecksumMismatch { .. }) => {
                    stop_reason = ReadStopReason::ChecksumMismatch {
                        offset: offset as u64,
                    };
                    break;
                }
                Err(e) => {
                    stop_reason = ReadStopReason::ParseError {
                        offset: offset as u64,
                        detail: e.to_string(),
                    };
                    break;
                }
            }
        }

        Ok(WalReadResult {
            records,
            valid_end: offset as u64,
            stop_reason,
        })
    }
}

/// WAL reader errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalReaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Header missing or invalid
    #[error("invalid WAL header")]
    InvalidHeader,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::{DurabilityMode, WalWriter};
    use tempfile::TempDir;

    fn write_records(dir: &Path, count: u64) {
        let mut writer = WalWriter::open(dir, DurabilityMode::Always).unwrap();
        for seq in 1..=count {
            writer
                .append(&WalRecord::new(seq, seq * 10, format!("m{seq}").into_bytes()))
                .unwrap();
        }
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let dir = TempDir::new().unwrap();
        let result = WalReader::read_all(dir.path()).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.stop_reason, ReadStopReason::EndOfData);
    }

    #[test]
    fn test_reads_records_in_order() {
        let dir = TempDir::new().unwrap();
        write_records(dir.path(), 3);

        let result = WalReader::read_all(dir.path()).unwrap();
        let seqs: Vec<u64> = result.records.iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(result.records[1].payload, b"m2");
        assert_eq!(result.stop_reason, ReadStopReason::EndOfData);
    }

    #[test]
    fn test_torn_tail_is_partial_record() {
        let dir = TempDir::new().unwrap();
        write_records(dir.path(), 2);

        let path = wal_path(dir.path());
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 5]).unwrap();

        let result = WalReader::read_all(dir.path()).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.stop_reason, ReadStopReason::PartialRecord);
        assert!(result.valid_end < bytes.len() as u64);
    }

    #[test]
    fn test_flipped_byte_is_checksum_mismatch() {
        let dir = TempDir::new().unwrap();
        write_records(dir.path(), 2);

        let path = wal_path(dir.path());
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[WAL_HEADER_SIZE + 6] ^= 0xFF;
        std::fs::write(&path, bytes).unwrap();

        let result = WalReader::read_all(dir.path()).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(
            result.stop_reason,
            ReadStopReason::ChecksumMismatch {
                offset: WAL_HEADER_SIZE as u64
            }
        );
    }

    #[test]
    fn test_bad_header_is_error() {
        assert_eq!(
            WalReader::read_bytes(b"garbage!").unwrap_err(),
            WalReaderError::InvalidHeader
        );
    }
}
