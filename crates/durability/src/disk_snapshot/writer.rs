//! Crash-safe snapshot writer
//!
//! 1. Write to a temporary file (`.registry.snap.tmp`)
//! 2. fsync the temporary file
//! 3. Atomic rename to `registry.snap`
//!
//! Either the complete snapshot exists or the previous one does.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::format::snapshot::{snapshot_path, SnapshotHeader};
use crate::format::wal_record::compute_crc;

/// Snapshot writer with crash-safe semantics
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    /// Create a writer targeting a data directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotWriter { dir: dir.into() }
    }

    /// The data directory snapshots are written into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a snapshot of `payload` covering mutations up to `last_sequence`.
    ///
    /// Returns the number of bytes written.
    pub fn write(&self, last_sequence: u64, payload: &[u8]) -> io::Result<u64> {
        let final_path = snapshot_path(&self.dir);
        let temp_path = self.dir.join(".registry.snap.tmp");

        let header = SnapshotHeader::new(last_sequence, payload.len() as u64);
        let header_bytes = header.to_bytes();

        let mut covered = Vec::with_capacity(header_bytes.len() + payload.len());
        covered.extend_from_slice(&header_bytes);
        covered.extend_from_slice(payload);
        let crc = compute_crc(&covered);

        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            file.write_all(&covered)?;
            file.write_all(&crc.to_le_bytes())?;
            file.sync_all()?;
        }

        std::fs::rename(&temp_path, &final_path)?;

        Ok(covered.len() as u64 + 4)
    }
}
